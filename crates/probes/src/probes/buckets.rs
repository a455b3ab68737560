//! 오브젝트 스토리지 버킷 프로브
//!
//! 이름에 환경이 들어간 버킷마다 접근 가능 여부, 버전 관리, 크기를 확인합니다.

use std::sync::Arc;

use stackpulse_core::details::{BucketSummary, BucketsDetails};
use stackpulse_core::{CheckResult, ComponentKind, Details, Probe, ProbeError, RunContext};

use crate::cloud::CloudApi;
use crate::findings::Findings;

pub const NAME: &str = "buckets";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub struct BucketsProbe<C> {
    cloud: Arc<C>,
    environment: String,
}

impl<C: CloudApi> BucketsProbe<C> {
    pub fn new(cloud: Arc<C>, ctx: &RunContext) -> Self {
        Self {
            cloud,
            environment: ctx.environment.clone(),
        }
    }
}

impl<C: CloudApi> Probe for BucketsProbe<C> {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Buckets
    }

    async fn run(&self) -> Result<CheckResult, ProbeError> {
        let buckets: Vec<_> = self
            .cloud
            .list_buckets()
            .await?
            .into_iter()
            .filter(|b| b.name.contains(self.environment.as_str()))
            .collect();

        let mut findings = Findings::new();
        if buckets.is_empty() {
            findings.warn(format!("no buckets for environment '{}'", self.environment));
        }

        let mut summaries = Vec::with_capacity(buckets.len());
        for bucket in buckets {
            let mut summary = BucketSummary {
                name: bucket.name,
                created_at: bucket.created_at.to_rfc3339(),
                accessible: false,
                versioning: "Unknown".to_owned(),
                size_mb: 0.0,
            };
            match self.cloud.inspect_bucket(&summary.name).await {
                Ok(inspection) => {
                    summary.accessible = true;
                    summary.versioning = inspection.versioning;
                    summary.size_mb = inspection.size_bytes as f64 / BYTES_PER_MB;
                }
                Err(e) => findings.error(format!("bucket '{}' inaccessible: {e}", summary.name)),
            }
            summaries.push(summary);
        }

        let ok_message = format!("{} buckets accessible", summaries.len());
        let details = Details::Buckets(BucketsDetails { buckets: summaries });
        Ok(findings.finish(NAME, ComponentKind::Buckets, ok_message, details))
    }
}
