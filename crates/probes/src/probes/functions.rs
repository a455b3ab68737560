//! 서버리스 함수 프로브
//!
//! 설정된 접두어마다 일치하는 함수를 찾고, 함수 상태와 최근 1시간 에러 로그 수를 봅니다.
//! 에러 로그 조회 실패는 무시합니다 (로그 그룹이 아직 없을 수 있음).

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use stackpulse_core::details::{FunctionGroup, FunctionSummary, FunctionsDetails};
use stackpulse_core::{CheckResult, ComponentKind, Details, Probe, ProbeError, RunContext};

use crate::cloud::{CloudApi, Function};
use crate::findings::Findings;

pub const NAME: &str = "functions";

/// 함수 상태와 최근 에러를 검사하는 프로브
pub struct FunctionsProbe<C> {
    cloud: Arc<C>,
    prefixes: Vec<String>,
}

impl<C: CloudApi> FunctionsProbe<C> {
    /// `prefixes`의 `{env}`, `{app}` 자리표시자는 컨텍스트로 치환됩니다.
    pub fn new(cloud: Arc<C>, ctx: &RunContext, prefixes: &[String]) -> Self {
        Self {
            cloud,
            prefixes: prefixes.iter().map(|p| ctx.expand(p)).collect(),
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    async fn error_count(&self, function: &str) -> Option<u32> {
        let since = Utc::now() - TimeDelta::hours(1);
        match self.cloud.recent_function_errors(function, since).await {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::debug!(function, error = %e, "error log lookup skipped");
                None
            }
        }
    }
}

impl<C: CloudApi> Probe for FunctionsProbe<C> {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Functions
    }

    async fn run(&self) -> Result<CheckResult, ProbeError> {
        let all = self.cloud.list_functions().await?;

        let mut findings = Findings::new();
        let mut groups = Vec::new();
        let mut missing_prefixes = Vec::new();
        // 접두어끼리 겹칠 수 있으므로 함수별 평가는 한 번만 합니다.
        let mut evaluated: BTreeMap<&str, FunctionSummary> = BTreeMap::new();

        for prefix in &self.prefixes {
            let matched: Vec<&Function> =
                all.iter().filter(|f| f.name.starts_with(prefix.as_str())).collect();
            if matched.is_empty() {
                findings.warn(format!("no functions with prefix '{prefix}'"));
                missing_prefixes.push(prefix.clone());
                continue;
            }

            let mut functions = Vec::with_capacity(matched.len());
            for function in matched {
                if let Some(summary) = evaluated.get(function.name.as_str()) {
                    functions.push(summary.clone());
                    continue;
                }
                let summary = self.summarize(function, &mut findings).await;
                evaluated.insert(function.name.as_str(), summary.clone());
                functions.push(summary);
            }
            groups.push(FunctionGroup {
                prefix: prefix.clone(),
                functions,
            });
        }

        let ok_message = format!(
            "{} functions active across {} prefixes",
            evaluated.len(),
            self.prefixes.len()
        );
        let details = Details::Functions(FunctionsDetails {
            groups,
            missing_prefixes,
        });
        Ok(findings.finish(NAME, ComponentKind::Functions, ok_message, details))
    }
}

impl<C: CloudApi> FunctionsProbe<C> {
    async fn summarize(&self, function: &Function, findings: &mut Findings) -> FunctionSummary {
        let state = function.state.clone().unwrap_or_else(|| "Unknown".to_owned());
        if state != "Active" {
            findings.warn(format!("{} state {state}", function.name));
        }

        let errors = self.error_count(&function.name).await;
        if let Some(count) = errors.filter(|c| *c > 0) {
            findings.warn(format!("{}: {count} errors in last hour", function.name));
        }

        FunctionSummary {
            name: function.name.clone(),
            state,
            runtime: function.runtime.clone().unwrap_or_else(|| "Unknown".to_owned()),
            last_modified: function
                .last_modified
                .clone()
                .unwrap_or_else(|| "Unknown".to_owned()),
            errors_last_hour: errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{FunctionRecord, Inventory, SnapshotCloud};
    use crate::testing::{FailingCloud, cloud, ctx};
    use stackpulse_core::Severity;

    fn record(name: &str, state: &str, errors: Option<u32>) -> FunctionRecord {
        FunctionRecord {
            function: Function {
                name: name.to_owned(),
                state: Some(state.to_owned()),
                runtime: Some("python3.11".to_owned()),
                last_modified: None,
            },
            errors_last_hour: errors,
        }
    }

    fn probe(records: Vec<FunctionRecord>, prefixes: &[&str]) -> FunctionsProbe<SnapshotCloud> {
        let inventory = Inventory {
            functions: Some(records),
            ..Default::default()
        };
        let prefixes: Vec<String> = prefixes.iter().map(|p| p.to_string()).collect();
        FunctionsProbe::new(cloud(inventory), &ctx(), &prefixes)
    }

    #[test]
    fn prefixes_are_expanded() {
        let probe = probe(Vec::new(), &["{env}-{app}-lambda", "{env}-chat-billing"]);
        assert_eq!(probe.prefixes(), ["dev-amplify-lambda", "dev-chat-billing"]);
    }

    #[tokio::test]
    async fn active_functions_without_errors_are_ok() {
        let result = probe(
            vec![
                record("dev-amplify-lambda-chat", "Active", Some(0)),
                record("dev-chat-billing-report", "Active", None),
            ],
            &["{env}-{app}-lambda", "{env}-chat-billing"],
        )
        .run()
        .await
        .unwrap();
        assert_eq!(result.severity, Severity::Ok);
        assert_eq!(result.message, "2 functions active across 2 prefixes");
    }

    #[tokio::test]
    async fn missing_prefix_is_warning() {
        let result = probe(
            vec![record("dev-amplify-lambda-chat", "Active", Some(0))],
            &["{env}-{app}-lambda", "{env}-data-disclosure"],
        )
        .run()
        .await
        .unwrap();
        assert_eq!(result.severity, Severity::Warning);
        assert_eq!(result.message, "no functions with prefix 'dev-data-disclosure'");
        match result.details {
            Details::Functions(d) => assert_eq!(d.missing_prefixes, vec!["dev-data-disclosure"]),
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[tokio::test]
    async fn recent_errors_and_inactive_state_are_warnings() {
        let result = probe(
            vec![
                record("dev-amplify-lambda-chat", "Active", Some(7)),
                record("dev-amplify-lambda-ops", "Pending", Some(0)),
            ],
            &["{env}-{app}-lambda"],
        )
        .run()
        .await
        .unwrap();
        assert_eq!(result.severity, Severity::Warning);
        assert!(result.message.contains("dev-amplify-lambda-chat: 7 errors in last hour"));
        assert!(result.message.contains("dev-amplify-lambda-ops state Pending"));
    }

    #[tokio::test]
    async fn missing_log_group_is_ignored() {
        let result = probe(
            vec![record("dev-amplify-lambda-chat", "Active", None)],
            &["{env}-{app}-lambda"],
        )
        .run()
        .await
        .unwrap();
        assert_eq!(result.severity, Severity::Ok);
        match result.details {
            Details::Functions(d) => assert_eq!(d.groups[0].functions[0].errors_last_hour, None),
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[tokio::test]
    async fn overlapping_prefixes_evaluate_each_function_once() {
        let result = probe(
            vec![record("dev-amplify-lambda-admin-users", "Active", Some(2))],
            &["{env}-{app}-lambda", "{env}-{app}-lambda-admin"],
        )
        .run()
        .await
        .unwrap();
        assert_eq!(result.message, "dev-amplify-lambda-admin-users: 2 errors in last hour");
        match result.details {
            Details::Functions(d) => assert_eq!(d.groups.len(), 2),
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[tokio::test]
    async fn listing_failure_propagates() {
        let probe = FunctionsProbe::new(FailingCloud::api("lambda"), &ctx(), &["x".to_owned()]);
        assert!(probe.run().await.is_err());
    }
}
