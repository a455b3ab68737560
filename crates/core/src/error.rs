//! 에러 타입: 도메인별 에러 정의
//!
//! 프로브 내부 실패([`ProbeError`])는 데이터로 취급되어 집계 경계에서
//! `Error` 심각도의 검사 결과로 변환됩니다. 실행 자체를 중단시키는 것은
//! 계약 위반([`EngineError::ContractViolation`])과 취소뿐입니다.

/// Stackpulse 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum StackpulseError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 레지스트리 구성 에러
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// 엔진 실행 에러
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// 직렬화 에러
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 프로브 레지스트리 에러
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// 같은 이름의 프로브가 이미 등록됨
    #[error("probe already registered: {name}")]
    AlreadyRegistered { name: String },
}

/// 엔진 실행 에러
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// 프로브가 계약을 위반함 (실행 즉시 중단)
    #[error("probe '{probe}' violated the probe contract: {reason}")]
    ContractViolation { probe: String, reason: String },

    /// 실행이 취소됨 (진행 중이던 리포트는 폐기)
    #[error("run cancelled before all probes completed")]
    Cancelled,
}

/// 프로브 내부 실패
///
/// 외부 API 에러, 타임아웃, 리소스 없음 등. 엔진이 `Error` 검사 결과로 변환합니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// 대상 리소스가 없음
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// 외부 API 호출 실패
    #[error("{service} api error: {reason}")]
    Api { service: String, reason: String },

    /// 프로브 시간 예산 초과
    #[error("probe timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    /// 대상에 도달할 수 없음
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// 그 밖의 내부 실패 (패닉 포함)
    #[error("{0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_error_display() {
        let err = ProbeError::Api {
            service: "ecs".to_owned(),
            reason: "AccessDenied".to_owned(),
        };
        assert_eq!(err.to_string(), "ecs api error: AccessDenied");

        let err = ProbeError::NotFound {
            resource: "cluster 'dev-amplify-cluster'".to_owned(),
        };
        assert!(err.to_string().contains("dev-amplify-cluster"));

        let err = ProbeError::Timeout { after_ms: 1500 };
        assert_eq!(err.to_string(), "probe timed out after 1500ms");

        let err = ProbeError::Internal("probe panicked: boom".to_owned());
        assert_eq!(err.to_string(), "probe panicked: boom");
    }

    #[test]
    fn engine_error_display() {
        let err = EngineError::ContractViolation {
            probe: "alarms".to_owned(),
            reason: "component mismatch".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("alarms"));
        assert!(msg.contains("component mismatch"));
    }

    #[test]
    fn converts_into_top_level_error() {
        let err: StackpulseError = RegistryError::AlreadyRegistered {
            name: "tables".to_owned(),
        }
        .into();
        assert!(matches!(err, StackpulseError::Registry(_)));

        let err: StackpulseError = EngineError::Cancelled.into();
        assert!(err.to_string().contains("cancelled"));
    }
}
