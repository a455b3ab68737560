//! 사용자 인증 풀 프로브

use std::sync::Arc;

use stackpulse_core::details::{IdentityPoolDetails, UserPoolSummary};
use stackpulse_core::{CheckResult, ComponentKind, Details, Probe, ProbeError, RunContext};

use crate::cloud::CloudApi;
use crate::findings::Findings;

pub const NAME: &str = "identity-pool";

/// `{env}-{app}-userpool`이 이름에 들어간 풀을 찾는 프로브
///
/// 상태가 보고되지 않은 풀은 경고하지 않습니다.
pub struct IdentityPoolProbe<C> {
    cloud: Arc<C>,
    pool_name: String,
}

impl<C: CloudApi> IdentityPoolProbe<C> {
    pub fn new(cloud: Arc<C>, ctx: &RunContext) -> Self {
        Self {
            cloud,
            pool_name: ctx.resource_name("userpool"),
        }
    }
}

impl<C: CloudApi> Probe for IdentityPoolProbe<C> {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::IdentityPool
    }

    async fn run(&self) -> Result<CheckResult, ProbeError> {
        let pools: Vec<_> = self
            .cloud
            .list_user_pools()
            .await?
            .into_iter()
            .filter(|p| p.name.contains(self.pool_name.as_str()))
            .collect();

        let mut findings = Findings::new();
        if pools.is_empty() {
            findings.warn(format!("no user pool matching '{}'", self.pool_name));
        }
        for pool in &pools {
            if let Some(status) = pool.status.as_deref().filter(|s| *s != "Enabled") {
                findings.warn(format!("user pool '{}' status {status}", pool.name));
            }
        }

        let users: u64 = pools.iter().map(|p| p.estimated_users).sum();
        let ok_message = format!("{} user pools found, ~{users} users", pools.len());
        let details = Details::IdentityPool(IdentityPoolDetails {
            pools: pools
                .into_iter()
                .map(|p| UserPoolSummary {
                    name: p.name,
                    id: p.id,
                    status: p.status.unwrap_or_else(|| "Unknown".to_owned()),
                    estimated_users: p.estimated_users,
                    mfa: p.mfa.unwrap_or_else(|| "OFF".to_owned()),
                })
                .collect(),
        });
        Ok(findings.finish(NAME, ComponentKind::IdentityPool, ok_message, details))
    }
}
