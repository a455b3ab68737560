//! 리포트 요약: 표시용 파생 뷰
//!
//! 닫힌 [`Report`]에서 상위 N개 오류, 판정별 권장 조치, 헤드라인을 만듭니다.
//! 리포트를 변경하지 않는 순수 변환입니다.

use serde::Serialize;

use crate::report::{Report, SeverityCounts};
use crate::types::{CheckResult, Severity};

/// 기본 상위 오류 개수
pub const DEFAULT_TOP_ISSUES: usize = 5;

const ERROR_ACTIONS: &[&str] = &[
    "Address critical issues immediately",
    "Check CloudWatch logs for detailed error information",
    "Verify service configurations match expected values",
];

const WARNING_ACTIONS: &[&str] = &[
    "Review warnings to prevent future issues",
    "Consider implementing missing health endpoints",
    "Enable rotation for secrets where applicable",
];

const HEALTHY_ACTIONS: &[&str] = &[
    "Continue monitoring for any changes",
    "Consider implementing additional health checks",
    "Review and update alarm thresholds as needed",
];

/// 판정별 권장 조치 목록을 반환합니다.
pub fn recommendations(verdict: Severity) -> &'static [&'static str] {
    match verdict {
        Severity::Error => ERROR_ACTIONS,
        Severity::Warning => WARNING_ACTIONS,
        Severity::Ok => HEALTHY_ACTIONS,
    }
}

/// 리포트 요약
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub verdict: Severity,
    pub score: f64,
    pub counts: SeverityCounts,
    /// 한 줄 상태 문구
    pub headline: String,
    /// 먼저 발견된 순서의 `Error` 결과 (최대 N개)
    pub top_issues: Vec<CheckResult>,
    pub recommendations: Vec<String>,
}

impl ReportSummary {
    /// 리포트에서 요약을 만듭니다.
    pub fn from_report(report: &Report, top_n: usize) -> Self {
        let counts = report.counts();
        let verdict = report.verdict();
        Self {
            verdict,
            score: report.score(),
            counts,
            headline: headline(verdict, &counts),
            top_issues: report
                .results_with(Severity::Error)
                .take(top_n)
                .cloned()
                .collect(),
            recommendations: recommendations(verdict)
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

fn headline(verdict: Severity, counts: &SeverityCounts) -> String {
    match verdict {
        Severity::Ok => "HEALTHY".to_owned(),
        Severity::Warning => format!("HEALTHY WITH WARNINGS ({} warnings)", counts.warning),
        Severity::Error => format!("UNHEALTHY ({} issues)", counts.error),
    }
}
