//! 공개 웹 엔드포인트 프로브
//!
//! `https://{domain}`과 `https://{domain}/api/health`에 GET을 보냅니다.
//!
//! | 엔드포인트 | 200 | 404 | 그 외 상태 | 연결 실패 |
//! |------------|-----|-----|------------|-----------|
//! | 웹 | Ok | Warning | Warning | Error |
//! | API 헬스 | Ok | Warning (미구현) | Warning | Error |

use std::sync::Arc;
use std::time::Duration;

use stackpulse_core::details::{EndpointStatus, EndpointsDetails};
use stackpulse_core::{CheckResult, ComponentKind, Details, Probe, ProbeError, RunContext};

use crate::findings::Findings;
use crate::http::{DEFAULT_REQUEST_TIMEOUT, HttpProber};

pub const NAME: &str = "web-endpoints";

/// 요청 두 개가 순차로 나가므로 요청 타임아웃 두 배에 여유를 더합니다.
const PROBE_TIMEOUT: Duration = Duration::from_secs(DEFAULT_REQUEST_TIMEOUT.as_secs() * 2 + 5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Web,
    ApiHealth,
}

impl Endpoint {
    fn label(self) -> &'static str {
        match self {
            Self::Web => "web endpoint",
            Self::ApiHealth => "api health endpoint",
        }
    }
}

pub struct WebEndpointsProbe<H> {
    http: Arc<H>,
    web_url: String,
    health_url: String,
}

impl<H: HttpProber> WebEndpointsProbe<H> {
    pub fn new(http: Arc<H>, ctx: &RunContext) -> Self {
        Self {
            http,
            web_url: format!("https://{}", ctx.domain),
            health_url: format!("https://{}/api/health", ctx.domain),
        }
    }

    async fn check(&self, endpoint: Endpoint, url: &str, findings: &mut Findings) -> EndpointStatus {
        match self.http.get(url).await {
            Ok(response) => {
                match (endpoint, response.status) {
                    (_, 200) => {}
                    (Endpoint::ApiHealth, 404) => {
                        findings.warn("api health endpoint not implemented (404)")
                    }
                    (_, status) => findings.warn(format!("{} returned {status}", endpoint.label())),
                }
                EndpointStatus {
                    url: url.to_owned(),
                    status_code: Some(response.status),
                    response_time_ms: Some(response.elapsed_ms()),
                    error: None,
                }
            }
            Err(e) => {
                findings.error(format!("{} unreachable: {}", endpoint.label(), e.reason));
                EndpointStatus {
                    url: url.to_owned(),
                    status_code: None,
                    response_time_ms: None,
                    error: Some(e.reason),
                }
            }
        }
    }
}

impl<H: HttpProber> Probe for WebEndpointsProbe<H> {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::WebEndpoints
    }

    fn timeout(&self) -> Option<Duration> {
        Some(PROBE_TIMEOUT)
    }

    async fn run(&self) -> Result<CheckResult, ProbeError> {
        let mut findings = Findings::new();
        let web = self.check(Endpoint::Web, &self.web_url, &mut findings).await;
        let health = self
            .check(Endpoint::ApiHealth, &self.health_url, &mut findings)
            .await;

        let ok_message = match (web.response_time_ms, health.response_time_ms) {
            (Some(w), Some(h)) => format!("web and api health returned 200 ({w:.0}ms, {h:.0}ms)"),
            _ => "web and api health returned 200".to_owned(),
        };
        let details = Details::Endpoints(EndpointsDetails {
            endpoints: vec![web, health],
        });
        Ok(findings.finish(NAME, ComponentKind::WebEndpoints, ok_message, details))
    }
}
