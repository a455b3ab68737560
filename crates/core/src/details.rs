//! 컴포넌트별 상세 지표
//!
//! [`Details`]는 컴포넌트 유형을 태그로 하는 합 타입입니다.
//! 엔진은 `component`, `severity`, `message`만 사용하며 상세 지표는 해석하지 않습니다.
//! 리포트 싱크(텍스트, JSON)가 그대로 출력합니다.

use serde::{Deserialize, Serialize};

/// 컴포넌트 유형별 상세 페이로드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Details {
    /// 상세 정보 없음 (프로브 실패, 타임아웃 등)
    #[default]
    None,
    /// 컴퓨트 클러스터
    Cluster(ClusterDetails),
    /// 로드 밸런서
    LoadBalancer(LoadBalancerDetails),
    /// 서버리스 함수
    Functions(FunctionsDetails),
    /// 테이블
    Tables(TablesDetails),
    /// 버킷
    Buckets(BucketsDetails),
    /// 웹 엔드포인트
    Endpoints(EndpointsDetails),
    /// API 게이트웨이
    Gateway(GatewayDetails),
    /// 인증 풀
    IdentityPool(IdentityPoolDetails),
    /// 알람
    Alarms(AlarmDetails),
    /// 시크릿
    Secrets(SecretsDetails),
    /// 네트워크
    Network(NetworkDetails),
}

impl Details {
    /// 상세 정보가 비어 있는지 확인합니다.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

// ─── Compute ─────────────────────────────────────────────────────────

/// 클러스터와 서비스 태스크 수
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterDetails {
    pub cluster_name: String,
    pub status: String,
    pub running_tasks: u32,
    pub pending_tasks: u32,
    pub service: Option<ServiceCounts>,
    pub tasks: Vec<TaskSummary>,
}

/// 서비스의 desired/running/pending 수
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceCounts {
    pub name: String,
    pub status: String,
    pub desired: u32,
    pub running: u32,
    pub pending: u32,
}

/// 실행 중 태스크 요약
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub id: String,
    pub status: String,
    pub health: String,
}

// ─── Load balancer ───────────────────────────────────────────────────

/// 로드 밸런서 상태와 타겟 그룹별 헬스
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancerDetails {
    pub name: String,
    pub dns_name: String,
    pub state: String,
    pub scheme: String,
    pub target_groups: Vec<TargetGroupHealth>,
}

/// 타겟 그룹 헬스 집계
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetGroupHealth {
    pub name: String,
    pub healthy_targets: u32,
    pub total_targets: u32,
    /// 비정상 타겟 `"id: state"` 목록
    pub unhealthy: Vec<String>,
}

// ─── Functions ───────────────────────────────────────────────────────

/// 접두어별 함수 목록
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionsDetails {
    pub groups: Vec<FunctionGroup>,
    /// 일치하는 함수가 없는 접두어
    pub missing_prefixes: Vec<String>,
}

/// 한 접두어에 일치한 함수들
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionGroup {
    pub prefix: String,
    pub functions: Vec<FunctionSummary>,
}

/// 함수 상태 요약
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionSummary {
    pub name: String,
    pub state: String,
    pub runtime: String,
    pub last_modified: String,
    /// 최근 1시간 에러 로그 수 (조회 실패 시 `None`)
    pub errors_last_hour: Option<u32>,
}

// ─── Storage ─────────────────────────────────────────────────────────

/// 테이블 목록
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablesDetails {
    pub tables: Vec<TableSummary>,
}

/// 테이블 요약
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub name: String,
    pub status: String,
    pub item_count: u64,
    pub size_mb: f64,
    pub billing_mode: String,
}

/// 버킷 목록
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketsDetails {
    pub buckets: Vec<BucketSummary>,
}

/// 버킷 요약
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub name: String,
    pub created_at: String,
    pub accessible: bool,
    pub versioning: String,
    pub size_mb: f64,
}

// ─── Endpoints ───────────────────────────────────────────────────────

/// HTTP 엔드포인트 검사 결과 목록
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointsDetails {
    pub endpoints: Vec<EndpointStatus>,
}

/// 단일 엔드포인트 응답
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointStatus {
    pub url: String,
    pub status_code: Option<u16>,
    pub response_time_ms: Option<f64>,
    pub error: Option<String>,
}

/// 게이트웨이 API 목록
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayDetails {
    pub apis: Vec<GatewayApiSummary>,
}

/// 게이트웨이 API 요약
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayApiSummary {
    /// `REST` 또는 `HTTP`
    pub protocol: String,
    pub name: String,
    pub id: String,
    pub endpoint: Option<String>,
}

// ─── Identity / alarms / secrets ─────────────────────────────────────

/// 인증 풀 목록
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityPoolDetails {
    pub pools: Vec<UserPoolSummary>,
}

/// 인증 풀 요약
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPoolSummary {
    pub name: String,
    pub id: String,
    pub status: String,
    pub estimated_users: u64,
    pub mfa: String,
}

/// 알람 상태 집계
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlarmDetails {
    pub total: u32,
    pub ok: u32,
    pub alarm: u32,
    pub insufficient_data: u32,
    pub active: Vec<ActiveAlarm>,
}

/// ALARM 상태인 알람
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveAlarm {
    pub name: String,
    pub reason: String,
}

/// 시크릿 목록
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretsDetails {
    pub secrets: Vec<SecretSummary>,
}

/// 시크릿 요약
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretSummary {
    pub name: String,
    pub rotation_enabled: bool,
    /// 마지막 접근 이후 경과 일수 (접근 기록 없으면 `None`)
    pub days_since_access: Option<i64>,
    pub last_changed: Option<String>,
}

// ─── Network ─────────────────────────────────────────────────────────

/// VPC, 서브넷, 보안 그룹 요약
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDetails {
    pub vpcs: Vec<VpcSummary>,
    pub subnets: Vec<SubnetSummary>,
    pub security_groups: Vec<SecurityGroupSummary>,
}

/// VPC 요약
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VpcSummary {
    pub id: String,
    pub cidr: String,
    pub state: String,
    pub subnet_count: usize,
}

/// 서브넷 요약
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubnetSummary {
    pub id: String,
    pub vpc_id: String,
    pub cidr: String,
    pub availability_zone: String,
    pub available_ips: u32,
}

/// 보안 그룹 요약
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityGroupSummary {
    pub id: String,
    pub name: String,
    pub ingress_rules: usize,
    pub egress_rules: usize,
}
