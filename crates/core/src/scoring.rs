//! 점수 및 판정: 검사 결과 집합에 대한 순수 함수
//!
//! - 점수: `100 * OK 수 / 전체 수`, 소수점 첫째 자리에서 반올림. 결과가 없으면 `0.0`.
//! - 판정: 가장 심각한 심각도가 이깁니다. 점수가 높아도 `Error`가 하나라도 있으면 `Error`입니다.
//!
//! `Warning`과 `Error`는 점수에서 똑같이 감점됩니다.

use crate::report::SeverityCounts;
use crate::types::{CheckResult, Severity};

/// 점수와 판정을 함께 계산합니다.
///
/// 결과가 비어 있으면 `(0.0, Severity::Ok)`를 반환합니다.
pub fn score_and_verdict(results: &[CheckResult]) -> (f64, Severity) {
    let counts = SeverityCounts::tally(results);
    (score(&counts), verdict(results))
}

/// 집계된 개수로부터 점수를 계산합니다.
pub fn score(counts: &SeverityCounts) -> f64 {
    let total = counts.total();
    if total == 0 {
        return 0.0;
    }
    round_one_decimal(100.0 * counts.ok as f64 / total as f64)
}

/// 가장 심각한 심각도를 판정으로 반환합니다.
pub fn verdict(results: &[CheckResult]) -> Severity {
    Severity::worst(results.iter().map(|r| r.severity))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
