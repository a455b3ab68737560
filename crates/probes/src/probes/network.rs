//! VPC 및 네트워크 프로브
//!
//! `Name` 태그에 환경이 들어간 VPC와 그 서브넷, 보안 그룹을 조회합니다.
//!
//! | 조건 | 심각도 |
//! |------|--------|
//! | 환경 VPC 없음 | Warning |
//! | VPC 상태 ≠ available | Warning |
//! | 가용 IP가 0인 서브넷 | Warning |

use std::sync::Arc;

use stackpulse_core::details::{
    NetworkDetails, SecurityGroupSummary, SubnetSummary, VpcSummary,
};
use stackpulse_core::{CheckResult, ComponentKind, Details, Probe, ProbeError, RunContext};

use crate::cloud::CloudApi;
use crate::findings::Findings;

pub const NAME: &str = "network";

pub struct NetworkProbe<C> {
    cloud: Arc<C>,
    environment: String,
}

impl<C: CloudApi> NetworkProbe<C> {
    pub fn new(cloud: Arc<C>, ctx: &RunContext) -> Self {
        Self {
            cloud,
            environment: ctx.environment.clone(),
        }
    }
}

impl<C: CloudApi> Probe for NetworkProbe<C> {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Network
    }

    async fn run(&self) -> Result<CheckResult, ProbeError> {
        let vpcs = self.cloud.list_vpcs(&self.environment).await?;

        let mut findings = Findings::new();
        if vpcs.is_empty() {
            findings.warn(format!("no VPC tagged with '{}'", self.environment));
        }

        let mut details = NetworkDetails::default();
        for vpc in vpcs {
            if vpc.state != "available" {
                findings.warn(format!("VPC {} state {}", vpc.id, vpc.state));
            }
            let subnets = self.cloud.list_subnets(&vpc.id).await?;
            for subnet in &subnets {
                if subnet.available_ips == 0 {
                    findings.warn(format!("subnet {} has no available IPs", subnet.id));
                }
            }
            details.vpcs.push(VpcSummary {
                id: vpc.id,
                cidr: vpc.cidr,
                state: vpc.state,
                subnet_count: subnets.len(),
            });
            details
                .subnets
                .extend(subnets.into_iter().map(|s| SubnetSummary {
                    id: s.id,
                    vpc_id: s.vpc_id,
                    cidr: s.cidr,
                    availability_zone: s.availability_zone,
                    available_ips: s.available_ips,
                }));
        }

        details.security_groups = self
            .cloud
            .list_security_groups(&self.environment)
            .await?
            .into_iter()
            .map(|g| SecurityGroupSummary {
                id: g.id,
                name: g.name,
                ingress_rules: g.ingress_rules,
                egress_rules: g.egress_rules,
            })
            .collect();

        let ok_message = format!(
            "{} VPCs available, {} subnets, {} security groups",
            details.vpcs.len(),
            details.subnets.len(),
            details.security_groups.len()
        );
        Ok(findings.finish(NAME, ComponentKind::Network, ok_message, Details::Network(details)))
    }
}
