//! 테이블 스토리지 프로브

use std::sync::Arc;

use stackpulse_core::details::{TableSummary, TablesDetails};
use stackpulse_core::{CheckResult, ComponentKind, Details, Probe, ProbeError, RunContext};

use crate::cloud::CloudApi;
use crate::findings::Findings;

pub const NAME: &str = "tables";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// 이름 패턴에 일치하는 테이블의 상태를 검사하는 프로브
///
/// - describe 실패 → Error
/// - ACTIVE가 아닌 테이블 → Warning
/// - 일치하는 테이블 없음 → Warning
pub struct TablesProbe<C> {
    cloud: Arc<C>,
    patterns: Vec<String>,
}

impl<C: CloudApi> TablesProbe<C> {
    pub fn new(cloud: Arc<C>, ctx: &RunContext, patterns: &[String]) -> Self {
        Self {
            cloud,
            patterns: patterns.iter().map(|p| ctx.expand(p)).collect(),
        }
    }

    fn matches(&self, table: &str) -> bool {
        self.patterns.iter().any(|p| table.contains(p.as_str()))
    }
}

impl<C: CloudApi> Probe for TablesProbe<C> {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Tables
    }

    async fn run(&self) -> Result<CheckResult, ProbeError> {
        let names: Vec<String> = self
            .cloud
            .list_tables()
            .await?
            .into_iter()
            .filter(|name| self.matches(name))
            .collect();

        let mut findings = Findings::new();
        if names.is_empty() {
            findings.warn("no tables match the configured patterns");
        }

        let mut tables = Vec::with_capacity(names.len());
        for name in &names {
            let table = match self.cloud.describe_table(name).await {
                Ok(table) => table,
                Err(e) => {
                    findings.error(format!("table '{name}': {e}"));
                    continue;
                }
            };
            if table.status != "ACTIVE" {
                findings.warn(format!("table '{}' status {}", table.name, table.status));
            }
            tables.push(TableSummary {
                name: table.name,
                status: table.status,
                item_count: table.item_count,
                size_mb: table.size_bytes as f64 / BYTES_PER_MB,
                billing_mode: table.billing_mode.unwrap_or_else(|| "PROVISIONED".to_owned()),
            });
        }

        let ok_message = format!("{} tables ACTIVE", tables.len());
        let details = Details::Tables(TablesDetails { tables });
        Ok(findings.finish(NAME, ComponentKind::Tables, ok_message, details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::Table;
    use crate::snapshot::{Inventory, SnapshotCloud, TableRecord};
    use crate::testing::{FailingCloud, cloud, ctx};
    use stackpulse_core::Severity;

    fn record(name: &str, status: &str, error: Option<&str>) -> TableRecord {
        TableRecord {
            table: Table {
                name: name.to_owned(),
                status: status.to_owned(),
                item_count: 10,
                size_bytes: 2 * 1024 * 1024,
                billing_mode: Some("PAY_PER_REQUEST".to_owned()),
            },
            error: error.map(str::to_owned),
        }
    }

    fn probe(records: Vec<TableRecord>) -> TablesProbe<SnapshotCloud> {
        let inventory = Inventory {
            tables: Some(records),
            ..Default::default()
        };
        let patterns = vec!["{env}-chat".to_owned(), "{env}-billing".to_owned()];
        TablesProbe::new(cloud(inventory), &ctx(), &patterns)
    }

    #[tokio::test]
    async fn active_tables_are_ok() {
        let result = probe(vec![
            record("dev-chat-history", "ACTIVE", None),
            record("dev-billing", "ACTIVE", None),
            record("prod-chat-history", "ACTIVE", None),
        ])
        .run()
        .await
        .unwrap();
        assert_eq!(result.severity, Severity::Ok);
        assert_eq!(result.message, "2 tables ACTIVE");
        match result.details {
            Details::Tables(d) => {
                assert_eq!(d.tables.len(), 2);
                assert!((d.tables[0].size_mb - 2.0).abs() < f64::EPSILON);
            }
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_matching_tables_is_warning() {
        let result = probe(vec![record("prod-chat", "ACTIVE", None)]).run().await.unwrap();
        assert_eq!(result.severity, Severity::Warning);
        assert_eq!(result.message, "no tables match the configured patterns");
    }

    #[tokio::test]
    async fn updating_table_is_warning() {
        let result = probe(vec![record("dev-chat", "UPDATING", None)]).run().await.unwrap();
        assert_eq!(result.severity, Severity::Warning);
        assert_eq!(result.message, "table 'dev-chat' status UPDATING");
    }

    #[tokio::test]
    async fn describe_failure_is_error_and_run_continues() {
        let result = probe(vec![
            record("dev-chat", "UPDATING", None),
            record("dev-billing", "ACTIVE", Some("ResourceNotFoundException")),
        ])
        .run()
        .await
        .unwrap();
        assert_eq!(result.severity, Severity::Error);
        assert!(result.message.starts_with("table 'dev-billing'"));
        match result.details {
            Details::Tables(d) => assert_eq!(d.tables.len(), 1),
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[tokio::test]
    async fn listing_failure_propagates() {
        let probe = TablesProbe::new(FailingCloud::api("dynamodb"), &ctx(), &[]);
        assert!(probe.run().await.is_err());
    }
}
