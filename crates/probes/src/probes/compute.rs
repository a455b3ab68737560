//! 컴퓨트 클러스터 프로브
//!
//! `{env}-{app}-cluster` 클러스터와 `{env}-{app}-service` 서비스를 조회합니다.
//!
//! | 조건 | 심각도 |
//! |------|--------|
//! | 클러스터 없음 / ACTIVE 아님 | Error |
//! | 서비스 없음 | Error |
//! | running ≠ desired | Warning |

use std::sync::Arc;

use stackpulse_core::details::{ClusterDetails, ServiceCounts, TaskSummary};
use stackpulse_core::{CheckResult, ComponentKind, Details, Probe, ProbeError, RunContext};

use crate::cloud::{CloudApi, Service};
use crate::error::CloudError;
use crate::findings::Findings;

pub const NAME: &str = "compute-cluster";

/// 클러스터와 서비스 태스크 수를 검사하는 프로브
pub struct ComputeClusterProbe<C> {
    cloud: Arc<C>,
    cluster: String,
    service: String,
}

impl<C: CloudApi> ComputeClusterProbe<C> {
    pub fn new(cloud: Arc<C>, ctx: &RunContext) -> Self {
        Self {
            cloud,
            cluster: ctx.resource_name("cluster"),
            service: ctx.resource_name("service"),
        }
    }
}

impl<C: CloudApi> Probe for ComputeClusterProbe<C> {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::ComputeCluster
    }

    async fn run(&self) -> Result<CheckResult, ProbeError> {
        let cluster = match self.cloud.describe_cluster(&self.cluster).await {
            Ok(cluster) => cluster,
            Err(CloudError::NotFound { .. }) => {
                return Ok(CheckResult::error(
                    NAME,
                    ComponentKind::ComputeCluster,
                    format!("cluster '{}' not found", self.cluster),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let mut findings = Findings::new();
        if cluster.status != "ACTIVE" {
            findings.error(format!(
                "cluster '{}' status {}",
                cluster.name, cluster.status
            ));
        }

        let service = match self.cloud.describe_service(&self.cluster, &self.service).await {
            Ok(service) => Some(service),
            Err(CloudError::NotFound { .. }) => {
                findings.error(format!("service '{}' not found", self.service));
                None
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(service) = service
            .as_ref()
            .filter(|s| s.running_count != s.desired_count)
        {
            findings.warn(format!(
                "task count mismatch: {}/{} running",
                service.running_count, service.desired_count
            ));
        }

        let ok_message = match &service {
            Some(s) => format!(
                "cluster ACTIVE, {}/{} tasks running",
                s.running_count, s.desired_count
            ),
            None => "cluster ACTIVE".to_owned(),
        };

        let details = Details::Cluster(ClusterDetails {
            cluster_name: cluster.name,
            status: cluster.status,
            running_tasks: cluster.running_tasks,
            pending_tasks: cluster.pending_tasks,
            tasks: service.as_ref().map(task_summaries).unwrap_or_default(),
            service: service.map(|s| ServiceCounts {
                name: s.name,
                status: s.status,
                desired: s.desired_count,
                running: s.running_count,
                pending: s.pending_count,
            }),
        });

        Ok(findings.finish(NAME, ComponentKind::ComputeCluster, ok_message, details))
    }
}

fn task_summaries(service: &Service) -> Vec<TaskSummary> {
    // 실행 중 태스크가 없으면 태스크 목록을 조회하지 않습니다.
    if service.running_count == 0 {
        return Vec::new();
    }
    service
        .tasks
        .iter()
        .map(|t| TaskSummary {
            id: t.id().to_owned(),
            status: t.last_status.clone(),
            health: t.health_status.clone().unwrap_or_else(|| "UNKNOWN".to_owned()),
        })
        .collect()
}
