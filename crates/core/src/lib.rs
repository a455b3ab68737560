//! # stackpulse-core
//!
//! 클라우드 배포 헬스 집계 엔진입니다.
//!
//! 프로브 계약([`Probe`]), 순서 있는 레지스트리([`ProbeRegistry`]),
//! 실행 엔진([`Engine`]), 점수와 판정([`scoring`]), 리포트([`Report`])와
//! 요약([`ReportSummary`])을 제공합니다.
//!
//! ```text
//! ProbeRegistry ──▶ Engine ──▶ ReportBuilder (OPEN) ──close()──▶ Report (CLOSED) ──▶ Sink
//!                     │
//!                     └─ probe 하나당 tokio 태스크 + 타임아웃
//! ```

pub mod config;
pub mod context;
pub mod details;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod probe;
pub mod registry;
pub mod report;
pub mod scoring;
pub mod summary;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, EngineError, ProbeError, RegistryError, StackpulseError};

// 설정
pub use config::StackpulseConfig;

// 실행
pub use context::RunContext;
pub use engine::{Engine, EngineConfig, ExecutionMode};
pub use probe::{BoxFuture, DynProbe, Probe};
pub use registry::ProbeRegistry;

// 결과물
pub use details::Details;
pub use report::{Report, ReportBuilder, SeverityCounts};
pub use scoring::score_and_verdict;
pub use summary::ReportSummary;
pub use types::{CheckResult, ComponentKind, Severity};
