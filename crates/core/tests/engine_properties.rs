//! 집계 엔진 통합 테스트
//!
//! - 결과 수 / 집계 수 일치
//! - 실행 방식과 무관한 등록 순서 보존
//! - 점수 / 판정 시나리오
//! - 실패, 패닉, 타임아웃 격리
//! - 멱등성, 취소, 계약 위반

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use stackpulse_core::{
    CheckResult, ComponentKind, Engine, EngineConfig, EngineError, ExecutionMode, Probe,
    ProbeError, ProbeRegistry, ReportSummary, RunContext, Severity,
};
use tokio_util::sync::CancellationToken;

// =============================================================================
// MockProbe
// =============================================================================

#[derive(Clone)]
enum Script {
    Result(Severity),
    Error(ProbeError),
    Panic(&'static str),
    Hang,
}

#[derive(Clone)]
struct MockProbe {
    name: String,
    script: Script,
    delay: Duration,
    timeout: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockProbe {
    fn new(name: impl Into<String>, script: Script) -> Self {
        Self {
            name: name.into(),
            script,
            delay: Duration::ZERO,
            timeout: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn ok(name: impl Into<String>) -> Self {
        Self::new(name, Script::Result(Severity::Ok))
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Probe for MockProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Custom(self.name.clone())
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn run(&self) -> Result<CheckResult, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.script {
            Script::Result(severity) => Ok(CheckResult::new(
                self.name.clone(),
                ComponentKind::Custom(self.name.clone()),
                *severity,
                format!("scripted {severity}"),
            )),
            Script::Error(err) => Err(err.clone()),
            Script::Panic(msg) => panic!("{msg}"),
            Script::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

fn ctx() -> RunContext {
    RunContext::new("dev", "us-east-1", "app.example.com", "amplify")
}

fn engine(mode: ExecutionMode) -> Engine {
    Engine::new(EngineConfig {
        mode,
        probe_timeout: Duration::from_secs(5),
    })
}

fn registry_of(probes: Vec<MockProbe>) -> ProbeRegistry {
    let mut registry = ProbeRegistry::new();
    for probe in probes {
        registry.register(probe).expect("unique probe names");
    }
    registry
}

fn scripted(ok: usize, warning: usize, error: usize) -> ProbeRegistry {
    let mut probes = Vec::new();
    for i in 0..ok {
        probes.push(MockProbe::ok(format!("ok-{i}")));
    }
    for i in 0..warning {
        probes.push(MockProbe::new(format!("warn-{i}"), Script::Result(Severity::Warning)));
    }
    for i in 0..error {
        probes.push(MockProbe::new(format!("err-{i}"), Script::Result(Severity::Error)));
    }
    registry_of(probes)
}

async fn run(mode: ExecutionMode, registry: &ProbeRegistry) -> stackpulse_core::Report {
    engine(mode)
        .run(registry, &ctx(), &CancellationToken::new())
        .await
        .expect("run should complete")
}

// =============================================================================
// 시나리오
// =============================================================================

#[tokio::test]
async fn five_ok_probes_score_hundred() {
    let report = run(ExecutionMode::Concurrent, &scripted(5, 0, 0)).await;
    assert_eq!(report.score(), 100.0);
    assert_eq!(report.verdict(), Severity::Ok);
}

#[tokio::test]
async fn three_ok_two_errors_score_sixty() {
    let report = run(ExecutionMode::Concurrent, &scripted(3, 0, 2)).await;
    assert_eq!(report.score(), 60.0);
    assert_eq!(report.verdict(), Severity::Error);
}

#[tokio::test]
async fn mixed_severities_error_wins() {
    let report = run(ExecutionMode::Sequential, &scripted(8, 1, 1)).await;
    assert_eq!(report.score(), 80.0);
    assert_eq!(report.verdict(), Severity::Error);
}

#[tokio::test]
async fn nine_ok_one_error_is_still_error() {
    let report = run(ExecutionMode::Concurrent, &scripted(9, 0, 1)).await;
    assert_eq!(report.score(), 90.0);
    assert_eq!(
        report.verdict(),
        Severity::Error,
        "a high score must never soften the verdict"
    );
}

#[tokio::test]
async fn empty_registry_reads_as_ok_with_zero_score() {
    // 검사가 하나도 없으면 점수 0, 판정 OK (정보가 없어도 건강하게 보이는 정책)
    let report = run(ExecutionMode::Concurrent, &ProbeRegistry::new()).await;
    assert!(report.results().is_empty());
    assert_eq!(report.score(), 0.0);
    assert_eq!(report.verdict(), Severity::Ok);

    let summary = ReportSummary::from_report(&report, 5);
    assert_eq!(summary.headline, "HEALTHY");
}

// =============================================================================
// 집계 불변식
// =============================================================================

#[tokio::test]
async fn counts_sum_to_results_and_probes() {
    let registry = scripted(4, 3, 2);
    for mode in [ExecutionMode::Sequential, ExecutionMode::Concurrent] {
        let report = run(mode, &registry).await;
        let counts = report.counts();
        assert_eq!(counts.total(), report.results().len());
        assert_eq!(report.results().len(), registry.len());
        assert_eq!((counts.ok, counts.warning, counts.error), (4, 3, 2));
    }
}

#[tokio::test]
async fn each_probe_runs_exactly_once() {
    let probes = vec![MockProbe::ok("a"), MockProbe::ok("b"), MockProbe::ok("c")];
    let handles = probes.clone();
    let registry = registry_of(probes);

    run(ExecutionMode::Concurrent, &registry).await;

    for probe in &handles {
        assert_eq!(probe.calls(), 1, "probe {} ran {} times", probe.name, probe.calls());
    }
}

#[tokio::test(start_paused = true)]
async fn ordering_matches_registration_in_both_modes() {
    // Given: 등록 순서와 반대로 끝나는 프로브들
    let probes: Vec<_> = (0..6)
        .map(|i| MockProbe::ok(format!("probe-{i}")).with_delay(Duration::from_millis(60 - i * 10)))
        .collect();
    let registry = registry_of(probes);

    // When
    let sequential = run(ExecutionMode::Sequential, &registry).await;
    let concurrent = run(ExecutionMode::Concurrent, &registry).await;

    // Then
    let names = |r: &stackpulse_core::Report| {
        r.results()
            .iter()
            .map(|c| c.component.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&sequential), registry.names());
    assert_eq!(names(&sequential), names(&concurrent));
}

#[tokio::test]
async fn repeated_runs_are_idempotent() {
    let registry = scripted(6, 2, 1);
    let first = run(ExecutionMode::Concurrent, &registry).await;
    let second = run(ExecutionMode::Concurrent, &registry).await;

    assert_eq!(first.counts(), second.counts());
    assert_eq!(first.score(), second.score());
    assert_eq!(first.verdict(), second.verdict());
    assert_ne!(first.run_id(), second.run_id());
}

// =============================================================================
// 실패 격리
// =============================================================================

#[tokio::test]
async fn probe_error_becomes_single_error_result() {
    let registry = registry_of(vec![
        MockProbe::ok("before"),
        MockProbe::new(
            "cluster",
            Script::Error(ProbeError::NotFound {
                resource: "cluster 'dev-amplify-cluster'".to_owned(),
            }),
        ),
        MockProbe::ok("after"),
    ]);

    let report = run(ExecutionMode::Sequential, &registry).await;

    assert_eq!(report.total(), 3, "run continues after a failing probe");
    let failed = &report.results()[1];
    assert_eq!(failed.component, "cluster");
    assert_eq!(failed.severity, Severity::Error);
    assert!(failed.message.contains("not found"));
    assert!(failed.details.is_none());
}

#[tokio::test]
async fn panicking_probe_is_one_error_result() {
    let registry = registry_of(vec![
        MockProbe::ok("a"),
        MockProbe::new("b", Script::Panic("index out of bounds")),
        MockProbe::ok("c"),
    ]);

    for mode in [ExecutionMode::Sequential, ExecutionMode::Concurrent] {
        let report = run(mode, &registry).await;
        assert_eq!(report.total(), 3);
        assert_eq!(report.counts().error, 1);
        let panicked = &report.results()[1];
        assert_eq!(panicked.severity, Severity::Error);
        assert!(panicked.message.starts_with("probe panicked: "));
    }
}

#[tokio::test(start_paused = true)]
async fn hanging_probe_times_out_with_its_own_budget() {
    let registry = registry_of(vec![
        MockProbe::new("hang", Script::Hang).with_timeout(Duration::from_millis(750)),
        MockProbe::ok("fine"),
    ]);

    let report = run(ExecutionMode::Concurrent, &registry).await;

    let hung = &report.results()[0];
    assert_eq!(hung.severity, Severity::Error);
    assert_eq!(hung.message, "probe timed out after 750ms");
    assert_eq!(report.results()[1].severity, Severity::Ok);
}

#[tokio::test(start_paused = true)]
async fn hanging_probe_uses_engine_default_budget() {
    let registry = registry_of(vec![MockProbe::new("hang", Script::Hang)]);
    let report = run(ExecutionMode::Sequential, &registry).await;
    assert_eq!(report.results()[0].message, "probe timed out after 5000ms");
}

// =============================================================================
// 치명적 조건
// =============================================================================

struct Impostor;

impl Probe for Impostor {
    fn name(&self) -> &str {
        "alarms"
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Alarms
    }

    async fn run(&self) -> Result<CheckResult, ProbeError> {
        Ok(CheckResult::ok("secrets", ComponentKind::Secrets, "wrong component"))
    }
}

#[tokio::test]
async fn component_mismatch_aborts_run() {
    let mut registry = ProbeRegistry::new();
    registry.register(MockProbe::ok("first")).unwrap();
    registry.register(Impostor).unwrap();
    registry.register(MockProbe::ok("last")).unwrap();

    for mode in [ExecutionMode::Sequential, ExecutionMode::Concurrent] {
        let err = engine(mode)
            .run(&registry, &ctx(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(
            matches!(err, EngineError::ContractViolation { ref probe, .. } if probe == "alarms"),
            "unexpected error: {err}"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn cancellation_discards_report() {
    let registry = registry_of(vec![
        MockProbe::ok("quick"),
        MockProbe::new("hang", Script::Hang).with_timeout(Duration::from_secs(3600)),
    ]);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let err = engine(ExecutionMode::Concurrent)
        .run(&registry, &ctx(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Cancelled));
}
