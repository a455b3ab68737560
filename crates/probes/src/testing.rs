//! 단위 테스트용 픽스처와 목

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use stackpulse_core::RunContext;

use crate::cloud::*;
use crate::error::{CloudError, HttpError};
use crate::http::{HttpProber, HttpResponse};
use crate::snapshot::{Inventory, SnapshotCloud};

pub fn ctx() -> RunContext {
    RunContext::new("dev", "us-east-1", "app.example.com", "amplify")
}

pub fn cloud(inventory: Inventory) -> Arc<SnapshotCloud> {
    Arc::new(SnapshotCloud::new(inventory))
}

/// 모든 호출이 같은 에러로 실패하는 클라우드
pub struct FailingCloud(pub CloudError);

impl FailingCloud {
    pub fn api(service: &str) -> Arc<Self> {
        Arc::new(Self(CloudError::Api {
            service: service.to_owned(),
            reason: "AccessDenied".to_owned(),
        }))
    }

    fn fail<T>(&self) -> Result<T, CloudError> {
        Err(self.0.clone())
    }
}

impl CloudApi for FailingCloud {
    async fn describe_cluster(&self, _: &str) -> Result<Cluster, CloudError> {
        self.fail()
    }
    async fn describe_service(&self, _: &str, _: &str) -> Result<Service, CloudError> {
        self.fail()
    }
    async fn find_load_balancer(&self, _: &str) -> Result<LoadBalancer, CloudError> {
        self.fail()
    }
    async fn target_groups(&self, _: &str) -> Result<Vec<TargetGroup>, CloudError> {
        self.fail()
    }
    async fn list_functions(&self) -> Result<Vec<Function>, CloudError> {
        self.fail()
    }
    async fn recent_function_errors(&self, _: &str, _: DateTime<Utc>) -> Result<u32, CloudError> {
        self.fail()
    }
    async fn list_tables(&self) -> Result<Vec<String>, CloudError> {
        self.fail()
    }
    async fn describe_table(&self, _: &str) -> Result<Table, CloudError> {
        self.fail()
    }
    async fn list_buckets(&self) -> Result<Vec<Bucket>, CloudError> {
        self.fail()
    }
    async fn inspect_bucket(&self, _: &str) -> Result<BucketInspection, CloudError> {
        self.fail()
    }
    async fn list_gateway_apis(&self) -> Result<Vec<GatewayApi>, CloudError> {
        self.fail()
    }
    async fn list_user_pools(&self) -> Result<Vec<UserPool>, CloudError> {
        self.fail()
    }
    async fn list_alarms(&self) -> Result<Vec<Alarm>, CloudError> {
        self.fail()
    }
    async fn list_secrets(&self) -> Result<Vec<Secret>, CloudError> {
        self.fail()
    }
    async fn list_vpcs(&self, _: &str) -> Result<Vec<Vpc>, CloudError> {
        self.fail()
    }
    async fn list_subnets(&self, _: &str) -> Result<Vec<Subnet>, CloudError> {
        self.fail()
    }
    async fn list_security_groups(&self, _: &str) -> Result<Vec<SecurityGroup>, CloudError> {
        self.fail()
    }
}

/// URL별 응답이 정해진 HTTP 목
#[derive(Default)]
pub struct ScriptedHttp {
    responses: HashMap<String, Result<u16, String>>,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_owned(), Ok(status));
        self
    }

    pub fn unreachable(mut self, url: &str, reason: &str) -> Self {
        self.responses.insert(url.to_owned(), Err(reason.to_owned()));
        self
    }
}

impl HttpProber for ScriptedHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        match self.responses.get(url) {
            Some(Ok(status)) => Ok(HttpResponse {
                status: *status,
                elapsed: Duration::from_millis(42),
            }),
            Some(Err(reason)) => Err(HttpError {
                url: url.to_owned(),
                reason: reason.clone(),
            }),
            None => Err(HttpError {
                url: url.to_owned(),
                reason: "no scripted response".to_owned(),
            }),
        }
    }
}
