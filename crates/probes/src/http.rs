//! HTTP endpoint prober.
//!
//! [`HttpProber`] issues a single GET and reports the status code and
//! latency. [`ReqwestProber`] is the production implementation; tests use an
//! in-memory fake.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::HttpError;

/// Per-request timeout applied by [`ReqwestProber`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Response summary of a single GET.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub elapsed: Duration,
}

impl HttpResponse {
    /// Elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Issues HTTP GET requests against public endpoints.
///
/// Any HTTP status (including 4xx/5xx) is a successful response; only
/// transport failures (DNS, TLS, connect, timeout) are errors.
pub trait HttpProber: Send + Sync + 'static {
    /// Sends a GET request to `url`.
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;
}

/// `reqwest`-backed prober (rustls, no redirects beyond the client default).
#[derive(Debug, Clone)]
pub struct ReqwestProber {
    client: reqwest::Client,
}

impl ReqwestProber {
    /// Builds a prober with the default 10 s timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Builds a prober with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stackpulse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError {
                url: String::new(),
                reason: format!("failed to build http client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl HttpProber for ReqwestProber {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let started = Instant::now();
        let response = self.client.get(url).send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                "request timed out".to_owned()
            } else if e.is_connect() {
                format!("connection failed: {e}")
            } else {
                e.to_string()
            };
            HttpError {
                url: url.to_owned(),
                reason,
            }
        })?;
        let status = response.status().as_u16();
        let elapsed = started.elapsed();
        tracing::debug!(url, status, elapsed_ms = elapsed.as_millis() as u64, "endpoint responded");
        Ok(HttpResponse { status, elapsed })
    }
}
