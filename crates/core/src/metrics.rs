//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 엔진과 CLI는 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다. 레코더가 설치되지 않으면 기록은 무시됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `stackpulse_`
//! - 접미어: `_total` (counter), `_seconds` (histogram), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use stackpulse_core::metrics;
//!
//! metrics::counter!(metrics::PROBE_RUNS_TOTAL, metrics::LABEL_COMPONENT => "tables")
//!     .increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 컴포넌트 레이블 키
pub const LABEL_COMPONENT: &str = "component";

/// 심각도 레이블 키 (ok, warning, error)
pub const LABEL_SEVERITY: &str = "severity";

/// 실패 사유 레이블 키 (error, timeout, panic)
pub const LABEL_REASON: &str = "reason";

// ─── 프로브 메트릭 ─────────────────────────────────────────────────

/// 실행된 프로브 수 (counter, labels: component, severity)
pub const PROBE_RUNS_TOTAL: &str = "stackpulse_probe_runs_total";

/// 결과를 돌려주지 못한 프로브 수 (counter, labels: component, reason)
pub const PROBE_FAILURES_TOTAL: &str = "stackpulse_probe_failures_total";

/// 프로브 소요 시간 (histogram, 초, label: component)
pub const PROBE_DURATION_SECONDS: &str = "stackpulse_probe_duration_seconds";

// ─── 리포트 메트릭 ─────────────────────────────────────────────────

/// 마지막 리포트 점수 (gauge, 0~100)
pub const REPORT_SCORE: &str = "stackpulse_report_score";

/// 마지막 리포트의 심각도별 결과 수 (gauge, label: severity)
pub const REPORT_CHECKS: &str = "stackpulse_report_checks";

/// 마지막 리포트 판정 (gauge, 0=ok 1=warning 2=error)
pub const REPORT_VERDICT: &str = "stackpulse_report_verdict";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 프로브 소요 시간 히스토그램 버킷 (초)
///
/// 외부 API 호출 기준 10ms ~ 30s
pub const PROBE_DURATION_BUCKETS: [f64; 9] = [0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 10.0, 30.0];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!(
        PROBE_RUNS_TOTAL,
        "Total number of probe executions by resulting severity"
    );
    describe_counter!(
        PROBE_FAILURES_TOTAL,
        "Probes that returned an error, timed out, or panicked"
    );
    describe_histogram!(
        PROBE_DURATION_SECONDS,
        "Wall-clock time of a single probe run in seconds"
    );
    describe_gauge!(REPORT_SCORE, "Health score of the most recent report (0-100)");
    describe_gauge!(
        REPORT_CHECKS,
        "Number of checks in the most recent report by severity"
    );
    describe_gauge!(
        REPORT_VERDICT,
        "Verdict of the most recent report (0=ok, 1=warning, 2=error)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_share_prefix() {
        for name in [
            PROBE_RUNS_TOTAL,
            PROBE_FAILURES_TOTAL,
            PROBE_DURATION_SECONDS,
            REPORT_SCORE,
            REPORT_CHECKS,
            REPORT_VERDICT,
        ] {
            assert!(name.starts_with("stackpulse_"), "{name} missing prefix");
        }
    }

    #[test]
    fn duration_buckets_are_sorted() {
        assert!(PROBE_DURATION_BUCKETS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn describe_all_without_recorder_is_noop() {
        describe_all();
    }
}
