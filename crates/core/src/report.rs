//! 리포트: 한 번의 실행에 대한 집계 결과물
//!
//! 리포트는 두 상태를 가집니다.
//!
//! - **OPEN** ([`ReportBuilder`]): 엔진 실행 중에만 존재하며 결과를 하나씩 추가받습니다.
//! - **CLOSED** ([`Report`]): [`ReportBuilder::close`]가 빌더를 소비하며 점수와 판정을 계산합니다.
//!   이후에는 읽기 전용 접근자만 제공됩니다.
//!
//! `close()`가 `self`를 소비하므로 OPEN → CLOSED 전이는 정확히 한 번이며 되돌릴 수 없습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::RunContext;
use crate::scoring;
use crate::types::{CheckResult, Severity};

/// 심각도별 결과 개수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub ok: usize,
    pub warning: usize,
    pub error: usize,
}

impl SeverityCounts {
    /// 결과 목록을 심각도별로 집계합니다.
    pub fn tally(results: &[CheckResult]) -> Self {
        results.iter().fold(Self::default(), |mut counts, r| {
            match r.severity {
                Severity::Ok => counts.ok += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Error => counts.error += 1,
            }
            counts
        })
    }

    /// 주어진 심각도의 개수를 반환합니다.
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Ok => self.ok,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }

    /// 전체 개수
    pub fn total(&self) -> usize {
        self.ok + self.warning + self.error
    }
}

/// 실행 중인(OPEN) 리포트
#[derive(Debug)]
pub struct ReportBuilder {
    run_id: Uuid,
    timestamp: DateTime<Utc>,
    environment: String,
    region: String,
    domain: String,
    results: Vec<CheckResult>,
}

impl ReportBuilder {
    /// 실행 시작 시점의 컨텍스트로 빈 리포트를 엽니다.
    pub fn new(ctx: &RunContext) -> Self {
        Self::at(ctx, Utc::now())
    }

    /// 지정한 시각으로 빈 리포트를 엽니다.
    pub fn at(ctx: &RunContext, timestamp: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            timestamp,
            environment: ctx.environment.clone(),
            region: ctx.region.clone(),
            domain: ctx.domain.clone(),
            results: Vec::new(),
        }
    }

    /// 결과를 하나 추가합니다.
    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// 지금까지 추가된 결과 수
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// 추가된 결과가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// 점수와 판정을 계산하고 리포트를 닫습니다.
    pub fn close(self) -> Report {
        let counts = SeverityCounts::tally(&self.results);
        let (score, verdict) = scoring::score_and_verdict(&self.results);
        Report {
            run_id: self.run_id,
            timestamp: self.timestamp,
            environment: self.environment,
            region: self.region,
            domain: self.domain,
            results: self.results,
            counts,
            score,
            verdict,
        }
    }
}

/// 닫힌(CLOSED) 리포트
///
/// 생성 후에는 변경할 수 없습니다. 싱크는 점수나 심각도를 다시 계산하지 않고
/// 이 값을 그대로 소비합니다.
///
/// 역직렬화 시 저장된 개수, 점수, 판정이 결과에서 다시 계산한 값과
/// 다르면 거부합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredReport")]
pub struct Report {
    run_id: Uuid,
    timestamp: DateTime<Utc>,
    environment: String,
    region: String,
    domain: String,
    results: Vec<CheckResult>,
    counts: SeverityCounts,
    score: f64,
    verdict: Severity,
}

/// 저장된 리포트의 원시 형태
#[derive(Deserialize)]
struct StoredReport {
    run_id: Uuid,
    timestamp: DateTime<Utc>,
    environment: String,
    region: String,
    domain: String,
    results: Vec<CheckResult>,
    counts: SeverityCounts,
    score: f64,
    verdict: Severity,
}

impl TryFrom<StoredReport> for Report {
    type Error = String;

    fn try_from(stored: StoredReport) -> Result<Self, Self::Error> {
        let counts = SeverityCounts::tally(&stored.results);
        let (score, verdict) = scoring::score_and_verdict(&stored.results);
        if stored.counts != counts {
            return Err(format!(
                "stored counts {:?} do not match results {:?}",
                stored.counts, counts
            ));
        }
        if stored.score != score {
            return Err(format!(
                "stored score {} does not match results ({score})",
                stored.score
            ));
        }
        if stored.verdict != verdict {
            return Err(format!(
                "stored verdict {} does not match results ({verdict})",
                stored.verdict
            ));
        }
        Ok(Self {
            run_id: stored.run_id,
            timestamp: stored.timestamp,
            environment: stored.environment,
            region: stored.region,
            domain: stored.domain,
            results: stored.results,
            counts,
            score,
            verdict,
        })
    }
}

impl Report {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// 등록 순서대로 정렬된 검사 결과
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn counts(&self) -> SeverityCounts {
        self.counts
    }

    /// 0.0 ~ 100.0 범위의 점수
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn verdict(&self) -> Severity {
        self.verdict
    }

    /// 전체 검사 수
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// 주어진 심각도의 결과만 순서대로 반환합니다.
    pub fn results_with(&self, severity: Severity) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(move |r| r.severity == severity)
    }

    /// 싱크가 소비하는 구조화된 값으로 변환합니다.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
