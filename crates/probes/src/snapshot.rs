//! 인벤토리 스냅샷 기반 [`CloudApi`] 구현
//!
//! 클라우드 계정에서 내보낸 JSON 인벤토리를 읽어 질의에 응답합니다.
//!
//! - 섹션이 없으면 해당 서비스는 `CloudError::Unavailable`을 반환합니다.
//! - `failures` 맵에 서비스 이름이 있으면 해당 서비스의 모든 호출이 `CloudError::Api`로 실패합니다.
//! - 테이블과 버킷 레코드의 `error` 필드는 개별 리소스 조회 실패를 나타냅니다.
//!
//! ```json
//! {
//!   "clusters": [{ "name": "dev-amplify-cluster", "status": "ACTIVE" }],
//!   "tables": [{ "name": "dev-chat", "status": "ACTIVE", "error": null }],
//!   "failures": { "cloudwatch": "AccessDenied" }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cloud::{
    Alarm, Bucket, BucketInspection, CloudApi, Cluster, Function, GatewayApi, LoadBalancer,
    SecurityGroup, Secret, Service, Subnet, Table, TargetGroup, UserPool, Vpc,
};
use crate::error::{CloudError, InventoryError};

// 서비스 이름 (failures 키와 에러 메시지에 사용)
pub const SERVICE_ECS: &str = "ecs";
pub const SERVICE_ELB: &str = "elbv2";
pub const SERVICE_LAMBDA: &str = "lambda";
pub const SERVICE_LOGS: &str = "logs";
pub const SERVICE_DYNAMODB: &str = "dynamodb";
pub const SERVICE_S3: &str = "s3";
pub const SERVICE_APIGATEWAY: &str = "apigateway";
pub const SERVICE_COGNITO: &str = "cognito";
pub const SERVICE_CLOUDWATCH: &str = "cloudwatch";
pub const SERVICE_SECRETS: &str = "secretsmanager";
pub const SERVICE_EC2: &str = "ec2";

/// 로드 밸런서와 연결된 타겟 그룹
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancerRecord {
    #[serde(flatten)]
    pub load_balancer: LoadBalancer,
    #[serde(default)]
    pub target_groups: Vec<TargetGroup>,
}

/// 함수와 최근 1시간 에러 로그 수
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    #[serde(flatten)]
    pub function: Function,
    /// `None`이면 로그 그룹이 없습니다.
    #[serde(default)]
    pub errors_last_hour: Option<u32>,
}

/// 테이블과 조회 실패 사유
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    #[serde(flatten)]
    pub table: Table,
    #[serde(default)]
    pub error: Option<String>,
}

/// 버킷과 접근 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketRecord {
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_versioning")]
    pub versioning: String,
    #[serde(default)]
    pub size_bytes: u64,
    /// 접근 실패 사유 (예: `AccessDenied`)
    #[serde(default)]
    pub error: Option<String>,
}

fn default_versioning() -> String {
    "Disabled".to_owned()
}

/// 클라우드 인벤토리 문서
///
/// 모든 섹션은 선택 사항입니다. 빠진 섹션은 "조회 불가"를 의미하며 빈 배열과 구분됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub clusters: Option<Vec<Cluster>>,
    pub services: Option<Vec<Service>>,
    pub load_balancers: Option<Vec<LoadBalancerRecord>>,
    pub functions: Option<Vec<FunctionRecord>>,
    pub tables: Option<Vec<TableRecord>>,
    pub buckets: Option<Vec<BucketRecord>>,
    pub gateway_apis: Option<Vec<GatewayApi>>,
    pub user_pools: Option<Vec<UserPool>>,
    pub alarms: Option<Vec<Alarm>>,
    pub secrets: Option<Vec<Secret>>,
    pub vpcs: Option<Vec<Vpc>>,
    pub subnets: Option<Vec<Subnet>>,
    pub security_groups: Option<Vec<SecurityGroup>>,
    /// 서비스 이름 → API 실패 사유
    #[serde(default)]
    pub failures: BTreeMap<String, String>,
}

/// 스냅샷 기반 클라우드 클라이언트
#[derive(Debug, Clone, Default)]
pub struct SnapshotCloud {
    inventory: Inventory,
}

impl SnapshotCloud {
    /// 메모리 내 인벤토리로 생성합니다.
    pub fn new(inventory: Inventory) -> Self {
        Self { inventory }
    }

    /// JSON 인벤토리 파일을 읽습니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| InventoryError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let inventory: Inventory =
            serde_json::from_str(&content).map_err(|source| InventoryError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        tracing::info!(path = %path.display(), "inventory snapshot loaded");
        Ok(Self::new(inventory))
    }

    /// JSON 문자열에서 생성합니다.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// 인벤토리를 반환합니다.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    fn check_service(&self, service: &str) -> Result<(), CloudError> {
        match self.inventory.failures.get(service) {
            Some(reason) => Err(CloudError::Api {
                service: service.to_owned(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn section<'a, T>(
        &self,
        section: &'a Option<Vec<T>>,
        service: &str,
        label: &str,
    ) -> Result<&'a [T], CloudError> {
        self.check_service(service)?;
        section.as_deref().ok_or_else(|| CloudError::Unavailable {
            service: service.to_owned(),
            reason: format!("no '{label}' section in inventory"),
        })
    }
}

impl CloudApi for SnapshotCloud {
    async fn describe_cluster(&self, name: &str) -> Result<Cluster, CloudError> {
        self.section(&self.inventory.clusters, SERVICE_ECS, "clusters")?
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| CloudError::NotFound {
                kind: "cluster",
                name: name.to_owned(),
            })
    }

    async fn describe_service(&self, cluster: &str, service: &str) -> Result<Service, CloudError> {
        self.section(&self.inventory.services, SERVICE_ECS, "services")?
            .iter()
            .find(|s| s.cluster == cluster && s.name == service)
            .cloned()
            .ok_or_else(|| CloudError::NotFound {
                kind: "service",
                name: service.to_owned(),
            })
    }

    async fn find_load_balancer(&self, name: &str) -> Result<LoadBalancer, CloudError> {
        self.section(&self.inventory.load_balancers, SERVICE_ELB, "load_balancers")?
            .iter()
            .find(|r| r.load_balancer.name == name)
            .map(|r| r.load_balancer.clone())
            .ok_or_else(|| CloudError::NotFound {
                kind: "load balancer",
                name: name.to_owned(),
            })
    }

    async fn target_groups(&self, load_balancer: &str) -> Result<Vec<TargetGroup>, CloudError> {
        self.section(&self.inventory.load_balancers, SERVICE_ELB, "load_balancers")?
            .iter()
            .find(|r| r.load_balancer.name == load_balancer)
            .map(|r| r.target_groups.clone())
            .ok_or_else(|| CloudError::NotFound {
                kind: "load balancer",
                name: load_balancer.to_owned(),
            })
    }

    async fn list_functions(&self) -> Result<Vec<Function>, CloudError> {
        Ok(self
            .section(&self.inventory.functions, SERVICE_LAMBDA, "functions")?
            .iter()
            .map(|r| r.function.clone())
            .collect())
    }

    async fn recent_function_errors(
        &self,
        function: &str,
        _since: DateTime<Utc>,
    ) -> Result<u32, CloudError> {
        self.check_service(SERVICE_LOGS)?;
        let log_group = || CloudError::NotFound {
            kind: "log group",
            name: format!("/aws/lambda/{function}"),
        };
        self.section(&self.inventory.functions, SERVICE_LAMBDA, "functions")?
            .iter()
            .find(|r| r.function.name == function)
            .ok_or_else(log_group)?
            .errors_last_hour
            .ok_or_else(log_group)
    }

    async fn list_tables(&self) -> Result<Vec<String>, CloudError> {
        Ok(self
            .section(&self.inventory.tables, SERVICE_DYNAMODB, "tables")?
            .iter()
            .map(|r| r.table.name.clone())
            .collect())
    }

    async fn describe_table(&self, name: &str) -> Result<Table, CloudError> {
        let record = self
            .section(&self.inventory.tables, SERVICE_DYNAMODB, "tables")?
            .iter()
            .find(|r| r.table.name == name)
            .ok_or_else(|| CloudError::NotFound {
                kind: "table",
                name: name.to_owned(),
            })?;
        match &record.error {
            Some(reason) => Err(CloudError::Api {
                service: SERVICE_DYNAMODB.to_owned(),
                reason: reason.clone(),
            }),
            None => Ok(record.table.clone()),
        }
    }

    async fn list_buckets(&self) -> Result<Vec<Bucket>, CloudError> {
        Ok(self
            .section(&self.inventory.buckets, SERVICE_S3, "buckets")?
            .iter()
            .map(|r| Bucket {
                name: r.name.clone(),
                created_at: r.created_at,
            })
            .collect())
    }

    async fn inspect_bucket(&self, name: &str) -> Result<BucketInspection, CloudError> {
        let record = self
            .section(&self.inventory.buckets, SERVICE_S3, "buckets")?
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| CloudError::NotFound {
                kind: "bucket",
                name: name.to_owned(),
            })?;
        match &record.error {
            Some(reason) => Err(CloudError::Api {
                service: SERVICE_S3.to_owned(),
                reason: reason.clone(),
            }),
            None => Ok(BucketInspection {
                versioning: record.versioning.clone(),
                size_bytes: record.size_bytes,
            }),
        }
    }

    async fn list_gateway_apis(&self) -> Result<Vec<GatewayApi>, CloudError> {
        Ok(self
            .section(&self.inventory.gateway_apis, SERVICE_APIGATEWAY, "gateway_apis")?
            .to_vec())
    }

    async fn list_user_pools(&self) -> Result<Vec<UserPool>, CloudError> {
        Ok(self
            .section(&self.inventory.user_pools, SERVICE_COGNITO, "user_pools")?
            .to_vec())
    }

    async fn list_alarms(&self) -> Result<Vec<Alarm>, CloudError> {
        Ok(self
            .section(&self.inventory.alarms, SERVICE_CLOUDWATCH, "alarms")?
            .to_vec())
    }

    async fn list_secrets(&self) -> Result<Vec<Secret>, CloudError> {
        Ok(self
            .section(&self.inventory.secrets, SERVICE_SECRETS, "secrets")?
            .to_vec())
    }

    async fn list_vpcs(&self, name_filter: &str) -> Result<Vec<Vpc>, CloudError> {
        Ok(self
            .section(&self.inventory.vpcs, SERVICE_EC2, "vpcs")?
            .iter()
            .filter(|v| v.name.as_deref().is_some_and(|n| n.contains(name_filter)))
            .cloned()
            .collect())
    }

    async fn list_subnets(&self, vpc_id: &str) -> Result<Vec<Subnet>, CloudError> {
        Ok(self
            .section(&self.inventory.subnets, SERVICE_EC2, "subnets")?
            .iter()
            .filter(|s| s.vpc_id == vpc_id)
            .cloned()
            .collect())
    }

    async fn list_security_groups(
        &self,
        name_filter: &str,
    ) -> Result<Vec<SecurityGroup>, CloudError> {
        Ok(self
            .section(&self.inventory.security_groups, SERVICE_EC2, "security_groups")?
            .iter()
            .filter(|g| g.tag_name.as_deref().is_some_and(|n| n.contains(name_filter)))
            .cloned()
            .collect())
    }
}
