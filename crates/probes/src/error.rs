//! 프로브 크레이트 에러 타입
//!
//! - [`CloudError`]: 클라우드 API 조회 실패. 프로브 경계에서 [`ProbeError`]로 변환됩니다.
//! - [`InventoryError`]: 인벤토리 스냅샷 로딩 실패. 실행 전에 발생하므로 결과로 변환되지 않습니다.
//! - [`HttpError`]: HTTP 엔드포인트 요청 실패.

use stackpulse_core::error::ProbeError;

/// 클라우드 API 조회 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CloudError {
    /// 리소스가 존재하지 않음
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// API 호출 실패 (권한, 잘못된 요청 등)
    #[error("{service} api error: {reason}")]
    Api { service: String, reason: String },

    /// 요청 제한
    #[error("{service} throttled the request")]
    Throttled { service: String },

    /// 서비스 응답 불가 또는 데이터 없음
    #[error("{service} unavailable: {reason}")]
    Unavailable { service: String, reason: String },
}

impl CloudError {
    /// 리소스 없음 에러인지 확인합니다.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<CloudError> for ProbeError {
    fn from(err: CloudError) -> Self {
        match err {
            CloudError::NotFound { kind, name } => ProbeError::NotFound {
                resource: format!("{kind} '{name}'"),
            },
            CloudError::Api { service, reason } => ProbeError::Api { service, reason },
            CloudError::Throttled { service } => ProbeError::Api {
                service,
                reason: "request throttled".to_owned(),
            },
            CloudError::Unavailable { service, reason } => {
                ProbeError::Unreachable(format!("{service}: {reason}"))
            }
        }
    }
}

/// 인벤토리 스냅샷 로딩 에러
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// 파일을 읽을 수 없음
    #[error("failed to read inventory '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON 형식 오류
    #[error("failed to parse inventory '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// HTTP 요청 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("request to {url} failed: {reason}")]
pub struct HttpError {
    pub url: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_converts_to_probe_not_found() {
        let err: ProbeError = CloudError::NotFound {
            kind: "cluster",
            name: "dev-amplify-cluster".to_owned(),
        }
        .into();
        assert_eq!(err.to_string(), "cluster 'dev-amplify-cluster' not found");
    }

    #[test]
    fn throttled_converts_to_api_error() {
        let err: ProbeError = CloudError::Throttled {
            service: "logs".to_owned(),
        }
        .into();
        assert!(matches!(err, ProbeError::Api { ref reason, .. } if reason == "request throttled"));
    }

    #[test]
    fn unavailable_converts_to_unreachable() {
        let err: ProbeError = CloudError::Unavailable {
            service: "ec2".to_owned(),
            reason: "endpoint down".to_owned(),
        }
        .into();
        assert!(matches!(err, ProbeError::Unreachable(ref msg) if msg.contains("ec2")));
    }

    #[test]
    fn is_not_found() {
        let err = CloudError::NotFound {
            kind: "table",
            name: "x".to_owned(),
        };
        assert!(err.is_not_found());
        let err = CloudError::Throttled {
            service: "dynamodb".to_owned(),
        };
        assert!(!err.is_not_found());
    }
}
