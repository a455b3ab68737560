//! 서브시스템 프로브 모음
//!
//! 각 프로브는 [`CloudApi`] (웹 엔드포인트는 [`HttpProber`])를 `Arc`로 공유하고,
//! 실행 컨텍스트에서 리소스 이름을 한 번 계산해 둡니다. 생성 시 I/O는 없습니다.

pub mod alarms;
pub mod buckets;
pub mod compute;
pub mod endpoints;
pub mod functions;
pub mod gateway;
pub mod identity;
pub mod load_balancer;
pub mod network;
pub mod secrets;
pub mod tables;

use std::sync::Arc;

use stackpulse_core::config::NamingConfig;
use stackpulse_core::{ProbeRegistry, RegistryError, RunContext};

use crate::cloud::CloudApi;
use crate::http::HttpProber;

pub use alarms::AlarmsProbe;
pub use buckets::BucketsProbe;
pub use compute::ComputeClusterProbe;
pub use endpoints::WebEndpointsProbe;
pub use functions::FunctionsProbe;
pub use gateway::ApiGatewayProbe;
pub use identity::IdentityPoolProbe;
pub use load_balancer::LoadBalancerProbe;
pub use network::NetworkProbe;
pub use secrets::SecretsProbe;
pub use tables::TablesProbe;

/// 기본 프로브 11개를 보고서 순서대로 등록한 레지스트리를 만듭니다.
///
/// compute-cluster, load-balancer, functions, tables, buckets, web-endpoints,
/// api-gateway, identity-pool, alarms, secrets, network 순입니다.
pub fn default_registry<C, H>(
    ctx: &RunContext,
    naming: &NamingConfig,
    cloud: Arc<C>,
    http: Arc<H>,
) -> Result<ProbeRegistry, RegistryError>
where
    C: CloudApi,
    H: HttpProber,
{
    let mut registry = ProbeRegistry::new();
    registry.register(ComputeClusterProbe::new(Arc::clone(&cloud), ctx))?;
    registry.register(LoadBalancerProbe::new(Arc::clone(&cloud), ctx))?;
    registry.register(FunctionsProbe::new(
        Arc::clone(&cloud),
        ctx,
        &naming.function_prefixes,
    ))?;
    registry.register(TablesProbe::new(Arc::clone(&cloud), ctx, &naming.table_patterns))?;
    registry.register(BucketsProbe::new(Arc::clone(&cloud), ctx))?;
    registry.register(WebEndpointsProbe::new(http, ctx))?;
    registry.register(ApiGatewayProbe::new(Arc::clone(&cloud), ctx))?;
    registry.register(IdentityPoolProbe::new(Arc::clone(&cloud), ctx))?;
    registry.register(AlarmsProbe::new(Arc::clone(&cloud), ctx))?;
    registry.register(SecretsProbe::new(Arc::clone(&cloud), ctx))?;
    registry.register(NetworkProbe::new(cloud, ctx))?;

    tracing::debug!(probes = registry.len(), "default registry built");
    Ok(registry)
}
