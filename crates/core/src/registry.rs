//! 프로브 레지스트리: 실행할 프로브의 순서 있는 목록
//!
//! [`ProbeRegistry`]는 등록 순서를 보존합니다. 이 순서가 곧 리포트의 결과 순서입니다.
//! 레지스트리 구성은 I/O를 수행하지 않으며, 빈 레지스트리도 유효합니다.
//!
//! # 사용 예시
//! ```ignore
//! let mut registry = ProbeRegistry::new();
//! registry.register(ClusterProbe::new(&ctx, Arc::clone(&cloud)))?;
//! registry.register(LoadBalancerProbe::new(&ctx, Arc::clone(&cloud)))?;
//!
//! let report = engine.run(&registry, &ctx, &cancel).await?;
//! ```

use std::sync::Arc;

use crate::error::RegistryError;
use crate::probe::{DynProbe, Probe};

/// 프로브 레지스트리
#[derive(Default)]
pub struct ProbeRegistry {
    probes: Vec<Arc<dyn DynProbe>>,
}

impl ProbeRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self { probes: Vec::new() }
    }

    /// 프로브를 등록합니다.
    ///
    /// 동일한 이름의 프로브가 이미 있으면 에러를 반환합니다.
    pub fn register<P: Probe + 'static>(&mut self, probe: P) -> Result<(), RegistryError> {
        self.register_arc(Arc::new(probe))
    }

    /// 이미 `Arc`로 감싼 프로브를 등록합니다.
    pub fn register_arc(&mut self, probe: Arc<dyn DynProbe>) -> Result<(), RegistryError> {
        let name = probe.name().to_owned();
        if self.probes.iter().any(|p| p.name() == name) {
            return Err(RegistryError::AlreadyRegistered { name });
        }
        tracing::debug!(probe = %name, position = self.probes.len(), "probe registered");
        self.probes.push(probe);
        Ok(())
    }

    /// 등록 순서대로 프로브를 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DynProbe>> {
        self.probes.iter()
    }

    /// 등록된 프로브 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// 레지스트리가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// 등록 순서대로 프로브 이름을 반환합니다.
    pub fn names(&self) -> Vec<&str> {
        self.probes.iter().map(|p| p.name()).collect()
    }
}
