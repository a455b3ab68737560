//! 시크릿 저장소 프로브
//!
//! 시크릿 값은 읽지 않고 메타데이터(로테이션, 마지막 접근/변경 시각)만 봅니다.

use std::sync::Arc;

use chrono::Utc;
use stackpulse_core::details::{SecretSummary, SecretsDetails};
use stackpulse_core::{CheckResult, ComponentKind, Details, Probe, ProbeError, RunContext};

use crate::cloud::CloudApi;
use crate::findings::Findings;

pub const NAME: &str = "secrets";

/// 환경 시크릿의 로테이션 설정을 검사하는 프로브
pub struct SecretsProbe<C> {
    cloud: Arc<C>,
    environment: String,
}

impl<C: CloudApi> SecretsProbe<C> {
    pub fn new(cloud: Arc<C>, ctx: &RunContext) -> Self {
        Self {
            cloud,
            environment: ctx.environment.clone(),
        }
    }
}

impl<C: CloudApi> Probe for SecretsProbe<C> {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Secrets
    }

    async fn run(&self) -> Result<CheckResult, ProbeError> {
        let now = Utc::now();
        let secrets: Vec<SecretSummary> = self
            .cloud
            .list_secrets()
            .await?
            .into_iter()
            .filter(|s| s.name.contains(self.environment.as_str()))
            .map(|s| SecretSummary {
                days_since_access: s.last_accessed.map(|at| (now - at).num_days()),
                last_changed: s.last_changed.map(|at| at.to_rfc3339()),
                rotation_enabled: s.rotation_enabled,
                name: s.name,
            })
            .collect();

        let mut findings = Findings::new();
        if secrets.is_empty() {
            findings.warn(format!("no secrets for environment '{}'", self.environment));
        }
        let unrotated: Vec<&str> = secrets
            .iter()
            .filter(|s| !s.rotation_enabled)
            .map(|s| s.name.as_str())
            .collect();
        if !unrotated.is_empty() {
            findings.warn(format!("rotation disabled: {}", unrotated.join(", ")));
        }

        let ok_message = format!("{} secrets with rotation enabled", secrets.len());
        let details = Details::Secrets(SecretsDetails { secrets });
        Ok(findings.finish(NAME, ComponentKind::Secrets, ok_message, details))
    }
}
