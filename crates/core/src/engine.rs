//! 집계 엔진: 레지스트리의 모든 프로브를 실행하고 리포트를 만듭니다.
//!
//! # 실행 계약
//! - 등록된 프로브는 정확히 한 번씩 실행되고, 각각 정확히 하나의 결과를 남깁니다.
//! - 결과 순서는 실행 방식과 관계없이 등록 순서입니다.
//! - 프로브의 `Err`, 타임아웃, 패닉은 모두 `Error` 심각도 결과로 변환되며 실행은 계속됩니다.
//! - 프로브가 자신의 이름과 다른 `component`를 반환하면 계약 위반으로 실행을 즉시 중단합니다.
//! - 취소되면 진행 중인 태스크를 중단하고 열린 리포트를 폐기합니다.
//! - 재시도는 하지 않습니다.
//!
//! 각 프로브는 자체 tokio 태스크에서 실행되므로 패닉이 엔진으로 전파되지 않습니다.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::error::Elapsed;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::EngineSection;
use crate::context::RunContext;
use crate::error::{EngineError, ProbeError};
use crate::metrics as m;
use crate::probe::DynProbe;
use crate::registry::ProbeRegistry;
use crate::report::{Report, ReportBuilder};
use crate::types::{CheckResult, ComponentKind, Severity};

/// 기본 프로브 타임아웃
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// 프로브 스케줄링 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// 등록 순서대로 하나씩 실행
    Sequential,
    /// 모든 프로브를 동시에 실행한 뒤 등록 순서로 재조립
    #[default]
    Concurrent,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Concurrent => write!(f, "concurrent"),
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "concurrent" => Ok(Self::Concurrent),
            other => Err(format!("unknown execution mode '{other}'")),
        }
    }
}

/// 엔진 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub mode: ExecutionMode,
    /// 자체 타임아웃이 없는 프로브에 적용되는 기본값
    pub probe_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::default(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl From<&EngineSection> for EngineConfig {
    fn from(section: &EngineSection) -> Self {
        Self {
            mode: section.mode,
            probe_timeout: Duration::from_secs(section.probe_timeout_secs),
        }
    }
}

/// 태스크 하나의 실행 결과
struct Outcome {
    elapsed: Duration,
    result: Result<Result<CheckResult, ProbeError>, Elapsed>,
}

/// drop 시 태스크를 중단하는 핸들
struct TaskGuard(JoinHandle<Outcome>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// 집계 엔진
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// 엔진을 생성합니다.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// 엔진 설정을 반환합니다.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 레지스트리의 모든 프로브를 실행하고 닫힌 리포트를 반환합니다.
    ///
    /// # Errors
    ///
    /// - 프로브가 계약을 위반하면 `EngineError::ContractViolation`
    /// - 완료 전에 취소되면 `EngineError::Cancelled`
    pub async fn run(
        &self,
        registry: &ProbeRegistry,
        ctx: &RunContext,
        cancel: &CancellationToken,
    ) -> Result<Report, EngineError> {
        let started = Instant::now();
        tracing::info!(
            environment = %ctx.environment,
            region = %ctx.region,
            probes = registry.len(),
            mode = %self.config.mode,
            "health check run started"
        );

        let mut report = ReportBuilder::new(ctx);
        match self.config.mode {
            ExecutionMode::Sequential => {
                for probe in registry.iter() {
                    let guard = self.spawn(probe);
                    let result =
                        await_probe(probe.as_ref(), guard, cancel, self.budget(probe)).await?;
                    report.push(result);
                }
            }
            ExecutionMode::Concurrent => {
                let guards: Vec<_> = registry.iter().map(|p| self.spawn(p)).collect();
                for (probe, guard) in registry.iter().zip(guards) {
                    let result =
                        await_probe(probe.as_ref(), guard, cancel, self.budget(probe)).await?;
                    report.push(result);
                }
            }
        }

        let report = report.close();
        record_report_metrics(&report);
        tracing::info!(
            score = report.score(),
            verdict = %report.verdict(),
            ok = report.counts().ok,
            warning = report.counts().warning,
            error = report.counts().error,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "health check run finished"
        );
        Ok(report)
    }

    fn budget(&self, probe: &Arc<dyn DynProbe>) -> Duration {
        probe.timeout().unwrap_or(self.config.probe_timeout)
    }

    fn spawn(&self, probe: &Arc<dyn DynProbe>) -> TaskGuard {
        let budget = self.budget(probe);
        let span = tracing::info_span!("probe", component = %probe.name());
        let probe = Arc::clone(probe);
        let handle = tokio::spawn(
            async move {
                let started = Instant::now();
                let result = tokio::time::timeout(budget, probe.run()).await;
                Outcome {
                    elapsed: started.elapsed(),
                    result,
                }
            }
            .instrument(span),
        );
        TaskGuard(handle)
    }
}

/// 태스크 완료를 기다리거나 취소에 반응합니다.
async fn await_probe(
    probe: &dyn DynProbe,
    mut guard: TaskGuard,
    cancel: &CancellationToken,
    budget: Duration,
) -> Result<CheckResult, EngineError> {
    let joined = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::warn!(component = %probe.name(), "run cancelled, discarding open report");
            return Err(EngineError::Cancelled);
        }
        joined = &mut guard.0 => joined,
    };
    resolve(probe.name(), probe.kind(), joined, budget)
}

/// 태스크 결과를 하나의 검사 결과로 정규화합니다.
fn resolve(
    name: &str,
    kind: ComponentKind,
    joined: Result<Outcome, JoinError>,
    budget: Duration,
) -> Result<CheckResult, EngineError> {
    let result = match joined {
        Ok(Outcome {
            elapsed,
            result: Ok(Ok(result)),
        }) => {
            if result.component != name {
                return Err(EngineError::ContractViolation {
                    probe: name.to_owned(),
                    reason: format!("returned result for component '{}'", result.component),
                });
            }
            observe_duration(name, elapsed);
            tracing::debug!(component = name, severity = %result.severity, "probe completed");
            result
        }
        Ok(Outcome {
            elapsed,
            result: Ok(Err(err)),
        }) => {
            observe_duration(name, elapsed);
            record_failure(name, "error");
            tracing::warn!(component = name, error = %err, "probe failed");
            CheckResult::error(name, kind, err.to_string())
        }
        Ok(Outcome {
            elapsed,
            result: Err(_),
        }) => {
            observe_duration(name, elapsed);
            record_failure(name, "timeout");
            let err = ProbeError::Timeout {
                after_ms: budget.as_millis() as u64,
            };
            tracing::warn!(component = name, error = %err, "probe timed out");
            CheckResult::error(name, kind, err.to_string())
        }
        Err(join_err) => {
            record_failure(name, "panic");
            let err = ProbeError::Internal(panic_message(join_err));
            tracing::error!(component = name, error = %err, "probe task failed");
            CheckResult::error(name, kind, err.to_string())
        }
    };

    metrics::counter!(
        m::PROBE_RUNS_TOTAL,
        m::LABEL_COMPONENT => name.to_owned(),
        m::LABEL_SEVERITY => result.severity.as_str()
    )
    .increment(1);
    Ok(result)
}

fn panic_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    let reason = if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    };
    format!("probe panicked: {reason}")
}

fn observe_duration(name: &str, elapsed: Duration) {
    metrics::histogram!(m::PROBE_DURATION_SECONDS, m::LABEL_COMPONENT => name.to_owned())
        .record(elapsed.as_secs_f64());
}

fn record_failure(name: &str, reason: &'static str) {
    metrics::counter!(
        m::PROBE_FAILURES_TOTAL,
        m::LABEL_COMPONENT => name.to_owned(),
        m::LABEL_REASON => reason
    )
    .increment(1);
}

fn record_report_metrics(report: &Report) {
    metrics::gauge!(m::REPORT_SCORE).set(report.score());
    let verdict = match report.verdict() {
        Severity::Ok => 0.0,
        Severity::Warning => 1.0,
        Severity::Error => 2.0,
    };
    metrics::gauge!(m::REPORT_VERDICT).set(verdict);
    let counts = report.counts();
    for severity in Severity::ALL {
        metrics::gauge!(m::REPORT_CHECKS, m::LABEL_SEVERITY => severity.as_str())
            .set(counts.get(severity) as f64);
    }
}
