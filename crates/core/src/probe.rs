//! 프로브 trait: 외부 서브시스템 검사의 확장 포인트
//!
//! 새 서브시스템을 검사하려면 [`Probe`]를 구현합니다.
//! 레지스트리는 dyn-compatible한 [`DynProbe`]로 프로브를 보관합니다.
//!
//! # 계약
//! - `run()`은 항상 하나의 결과를 돌려줍니다: `Ok(CheckResult)` 또는 `Err(ProbeError)`.
//! - 반환한 결과의 `component`는 `name()`과 같아야 합니다.
//! - 프로브는 엔진 상태에 부수 효과를 남기지 않습니다.
//!
//! # 구현 예시
//! ```ignore
//! struct QueueProbe { depth: u32 }
//!
//! impl Probe for QueueProbe {
//!     fn name(&self) -> &str { "queue" }
//!     fn kind(&self) -> ComponentKind { ComponentKind::Custom("queue".to_owned()) }
//!
//!     async fn run(&self) -> Result<CheckResult, ProbeError> {
//!         if self.depth > 1000 {
//!             return Ok(CheckResult::warning(self.name(), self.kind(), "backlog growing"));
//!         }
//!         Ok(CheckResult::ok(self.name(), self.kind(), "queue drained"))
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::ProbeError;
use crate::types::{CheckResult, ComponentKind};

/// `Send` 가능한 boxed future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// 모든 서브시스템 프로브가 구현하는 trait
pub trait Probe: Send + Sync {
    /// 컴포넌트 이름 (레지스트리 내 고유)
    fn name(&self) -> &str;

    /// 컴포넌트 유형
    fn kind(&self) -> ComponentKind;

    /// 이 프로브 전용 타임아웃. `None`이면 엔진 기본값을 사용합니다.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// 외부 서브시스템을 조회하고 검사 결과를 반환합니다.
    fn run(&self) -> impl Future<Output = Result<CheckResult, ProbeError>> + Send;
}

/// dyn-compatible 프로브 trait
///
/// `Probe`는 RPITIT를 사용하므로 `dyn Probe`가 불가합니다.
/// `DynProbe`는 `BoxFuture`를 반환하여 `Arc<dyn DynProbe>`로 보관할 수 있게 합니다.
pub trait DynProbe: Send + Sync {
    /// 컴포넌트 이름
    fn name(&self) -> &str;

    /// 컴포넌트 유형
    fn kind(&self) -> ComponentKind;

    /// 프로브 전용 타임아웃
    fn timeout(&self) -> Option<Duration>;

    /// 검사 실행
    fn run(&self) -> BoxFuture<'_, Result<CheckResult, ProbeError>>;
}

/// Probe를 구현한 타입은 자동으로 DynProbe도 구현됩니다.
impl<T: Probe> DynProbe for T {
    fn name(&self) -> &str {
        Probe::name(self)
    }

    fn kind(&self) -> ComponentKind {
        Probe::kind(self)
    }

    fn timeout(&self) -> Option<Duration> {
        Probe::timeout(self)
    }

    fn run(&self) -> BoxFuture<'_, Result<CheckResult, ProbeError>> {
        Box::pin(Probe::run(self))
    }
}
