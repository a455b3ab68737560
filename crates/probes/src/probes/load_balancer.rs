//! 로드 밸런서 프로브
//!
//! `{env}-{app}-alb`를 찾고, 연결된 타겟 그룹의 타겟 헬스를 집계합니다.

use std::sync::Arc;

use stackpulse_core::details::{LoadBalancerDetails, TargetGroupHealth};
use stackpulse_core::{CheckResult, ComponentKind, Details, Probe, ProbeError, RunContext};

use crate::cloud::{CloudApi, TargetGroup};
use crate::error::CloudError;
use crate::findings::Findings;

pub const NAME: &str = "load-balancer";

/// 로드 밸런서 상태와 타겟 헬스를 검사하는 프로브
pub struct LoadBalancerProbe<C> {
    cloud: Arc<C>,
    load_balancer: String,
}

impl<C: CloudApi> LoadBalancerProbe<C> {
    pub fn new(cloud: Arc<C>, ctx: &RunContext) -> Self {
        Self {
            cloud,
            load_balancer: ctx.resource_name("alb"),
        }
    }
}

impl<C: CloudApi> Probe for LoadBalancerProbe<C> {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::LoadBalancer
    }

    async fn run(&self) -> Result<CheckResult, ProbeError> {
        let lb = match self.cloud.find_load_balancer(&self.load_balancer).await {
            Ok(lb) => lb,
            Err(CloudError::NotFound { .. }) => {
                return Ok(CheckResult::error(
                    NAME,
                    ComponentKind::LoadBalancer,
                    format!("load balancer '{}' not found", self.load_balancer),
                ));
            }
            Err(e) => return Err(e.into()),
        };
        let groups = self.cloud.target_groups(&lb.name).await?;

        let mut findings = Findings::new();
        if lb.state != "active" {
            findings.warn(format!("load balancer state {}", lb.state));
        }
        if groups.is_empty() {
            findings.warn("no target groups attached");
        }

        let health: Vec<TargetGroupHealth> = groups.iter().map(group_health).collect();
        for group in &health {
            if group.total_targets == 0 {
                findings.warn(format!("target group '{}': no targets registered", group.name));
            } else if group.healthy_targets < group.total_targets {
                findings.warn(format!(
                    "target group '{}': {}/{} targets healthy ({})",
                    group.name,
                    group.healthy_targets,
                    group.total_targets,
                    group.unhealthy.join(", ")
                ));
            }
        }

        let healthy: u32 = health.iter().map(|g| g.healthy_targets).sum();
        let total: u32 = health.iter().map(|g| g.total_targets).sum();
        let ok_message = format!("load balancer active, {healthy}/{total} targets healthy");

        let details = Details::LoadBalancer(LoadBalancerDetails {
            name: lb.name,
            dns_name: lb.dns_name,
            state: lb.state,
            scheme: lb.scheme,
            target_groups: health,
        });
        Ok(findings.finish(NAME, ComponentKind::LoadBalancer, ok_message, details))
    }
}

fn group_health(group: &TargetGroup) -> TargetGroupHealth {
    let healthy = group.targets.iter().filter(|t| t.is_healthy()).count() as u32;
    TargetGroupHealth {
        name: group.name.clone(),
        healthy_targets: healthy,
        total_targets: group.targets.len() as u32,
        unhealthy: group
            .targets
            .iter()
            .filter(|t| !t.is_healthy())
            .map(|t| format!("{}: {}", t.id, t.state))
            .collect(),
    }
}
