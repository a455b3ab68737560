//! 도메인 타입: 검사 결과와 심각도
//!
//! 모든 프로브와 엔진, 리포트 소비자가 공유하는 데이터 구조를 정의합니다.
//! 프로브는 [`CheckResult`]를 하나 반환하고, 엔진은 이를 재분류하지 않고 그대로 누적합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::details::Details;

/// 심각도 레벨
///
/// 개별 검사 분류와 리포트 전체 판정(verdict)에 모두 사용됩니다.
/// `Ord` 구현으로 비교가 가능합니다 (`Ok < Warning < Error`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 정상
    #[default]
    Ok,
    /// 경고: 동작하지만 주의 필요
    Warning,
    /// 오류: 즉시 대응 필요
    Error,
}

impl Severity {
    /// 모든 심각도를 오름차순으로 반환합니다.
    pub const ALL: [Severity; 3] = [Severity::Ok, Severity::Warning, Severity::Error];

    /// 가장 심각한 값을 반환합니다. 비어 있으면 `Ok`입니다.
    pub fn worst<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Severity>,
    {
        iter.into_iter().max().unwrap_or_default()
    }

    /// 메트릭 레이블 등에 쓰는 고정 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 컴포넌트 유형
///
/// 프로브가 검사하는 외부 서브시스템의 종류입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// 컴퓨트 클러스터와 서비스
    ComputeCluster,
    /// 애플리케이션 로드 밸런서
    LoadBalancer,
    /// 서버리스 함수
    Functions,
    /// 테이블 스토리지
    Tables,
    /// 오브젝트 스토리지 버킷
    Buckets,
    /// 공개 웹/헬스 엔드포인트
    WebEndpoints,
    /// API 게이트웨이
    ApiGateway,
    /// 사용자 인증 풀
    IdentityPool,
    /// 모니터링 알람
    Alarms,
    /// 시크릿 저장소
    Secrets,
    /// VPC 및 네트워크
    Network,
    /// 사용자 정의 컴포넌트
    Custom(String),
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComputeCluster => write!(f, "compute-cluster"),
            Self::LoadBalancer => write!(f, "load-balancer"),
            Self::Functions => write!(f, "functions"),
            Self::Tables => write!(f, "tables"),
            Self::Buckets => write!(f, "buckets"),
            Self::WebEndpoints => write!(f, "web-endpoints"),
            Self::ApiGateway => write!(f, "api-gateway"),
            Self::IdentityPool => write!(f, "identity-pool"),
            Self::Alarms => write!(f, "alarms"),
            Self::Secrets => write!(f, "secrets"),
            Self::Network => write!(f, "network"),
            Self::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}

/// 단일 프로브의 검사 결과
///
/// `severity`는 프로브가 결정하며, 엔진은 이를 다시 분류하지 않습니다.
/// `details`는 컴포넌트 유형별 구조화된 페이로드입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// 컴포넌트 식별 이름 (예: `"compute-cluster"`)
    pub component: String,
    /// 컴포넌트 유형
    pub kind: ComponentKind,
    /// 분류 결과
    pub severity: Severity,
    /// 짧은 설명
    pub message: String,
    /// 컴포넌트별 상세 지표
    #[serde(default)]
    pub details: Details,
}

impl CheckResult {
    /// 주어진 심각도로 결과를 생성합니다.
    pub fn new(
        component: impl Into<String>,
        kind: ComponentKind,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            kind,
            severity,
            message: message.into(),
            details: Details::None,
        }
    }

    /// `Ok` 결과를 생성합니다.
    pub fn ok(component: impl Into<String>, kind: ComponentKind, message: impl Into<String>) -> Self {
        Self::new(component, kind, Severity::Ok, message)
    }

    /// `Warning` 결과를 생성합니다.
    pub fn warning(
        component: impl Into<String>,
        kind: ComponentKind,
        message: impl Into<String>,
    ) -> Self {
        Self::new(component, kind, Severity::Warning, message)
    }

    /// `Error` 결과를 생성합니다.
    pub fn error(
        component: impl Into<String>,
        kind: ComponentKind,
        message: impl Into<String>,
    ) -> Self {
        Self::new(component, kind, Severity::Error, message)
    }

    /// 상세 지표를 설정합니다.
    pub fn with_details(mut self, details: Details) -> Self {
        self.details = details;
        self
    }

    /// 오류 결과인지 확인합니다.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.component, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Ok < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn severity_default_is_ok() {
        assert_eq!(Severity::default(), Severity::Ok);
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Ok.to_string(), "OK");
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Error.to_string(), "ERROR");
    }

    #[test]
    fn severity_worst_of_empty_is_ok() {
        assert_eq!(Severity::worst(Vec::new()), Severity::Ok);
    }

    #[test]
    fn severity_worst_picks_max() {
        let worst = Severity::worst([Severity::Ok, Severity::Error, Severity::Warning]);
        assert_eq!(worst, Severity::Error);
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }

    #[test]
    fn component_kind_display() {
        assert_eq!(ComponentKind::ComputeCluster.to_string(), "compute-cluster");
        assert_eq!(ComponentKind::WebEndpoints.to_string(), "web-endpoints");
        assert_eq!(
            ComponentKind::Custom("queue".to_owned()).to_string(),
            "custom:queue"
        );
    }

    #[test]
    fn check_result_constructors_set_severity() {
        let ok = CheckResult::ok("alarms", ComponentKind::Alarms, "all alarms OK");
        let warn = CheckResult::warning("alarms", ComponentKind::Alarms, "no alarms");
        let err = CheckResult::error("alarms", ComponentKind::Alarms, "2 active alarms");
        assert_eq!(ok.severity, Severity::Ok);
        assert_eq!(warn.severity, Severity::Warning);
        assert!(err.is_error());
        assert_eq!(ok.details, Details::None);
    }

    #[test]
    fn check_result_display() {
        let result = CheckResult::error("tables", ComponentKind::Tables, "describe failed");
        let display = result.to_string();
        assert!(display.contains("ERROR"));
        assert!(display.contains("tables"));
        assert!(display.contains("describe failed"));
    }
}
