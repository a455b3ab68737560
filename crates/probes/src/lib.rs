//! # stackpulse-probes
//!
//! 배포 스택의 서브시스템 프로브와 외부 협력자 추상화.
//!
//! - [`cloud`]: 클라우드 제어 평면 질의 trait [`CloudApi`]와 레코드 타입
//! - [`snapshot`]: 인벤토리 JSON 스냅샷 기반 구현 [`SnapshotCloud`]
//! - [`http`]: 공개 엔드포인트용 [`HttpProber`]와 `reqwest` 구현
//! - [`probes`]: 서브시스템 프로브 11개와 [`default_registry`]
//!
//! 프로브는 `stackpulse_core::Probe`를 구현하며, 레지스트리에 등록되어
//! 엔진이 실행합니다.

pub mod cloud;
pub mod error;
pub mod findings;
pub mod http;
pub mod probes;
pub mod snapshot;

#[cfg(test)]
mod testing;

pub use cloud::CloudApi;
pub use error::{CloudError, HttpError, InventoryError};
pub use findings::Findings;
pub use http::{HttpProber, HttpResponse, ReqwestProber};
pub use probes::default_registry;
pub use snapshot::{Inventory, SnapshotCloud};
