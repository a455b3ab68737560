//! API 게이트웨이 프로브

use std::sync::Arc;

use stackpulse_core::details::{GatewayApiSummary, GatewayDetails};
use stackpulse_core::{CheckResult, ComponentKind, Details, Probe, ProbeError, RunContext};

use crate::cloud::{ApiProtocol, CloudApi};
use crate::findings::Findings;

pub const NAME: &str = "api-gateway";

/// 이름에 환경이 들어간 REST/HTTP API를 찾는 프로브
pub struct ApiGatewayProbe<C> {
    cloud: Arc<C>,
    environment: String,
}

impl<C: CloudApi> ApiGatewayProbe<C> {
    pub fn new(cloud: Arc<C>, ctx: &RunContext) -> Self {
        Self {
            cloud,
            environment: ctx.environment.clone(),
        }
    }
}

impl<C: CloudApi> Probe for ApiGatewayProbe<C> {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::ApiGateway
    }

    async fn run(&self) -> Result<CheckResult, ProbeError> {
        let apis: Vec<_> = self
            .cloud
            .list_gateway_apis()
            .await?
            .into_iter()
            .filter(|api| api.name.contains(self.environment.as_str()))
            .collect();

        let mut findings = Findings::new();
        if apis.is_empty() {
            findings.warn(format!("no gateway APIs for environment '{}'", self.environment));
        }

        let rest = apis.iter().filter(|a| a.protocol == ApiProtocol::Rest).count();
        let ok_message = format!(
            "{} APIs found ({rest} REST, {} HTTP)",
            apis.len(),
            apis.len() - rest
        );
        let details = Details::Gateway(GatewayDetails {
            apis: apis
                .into_iter()
                .map(|api| GatewayApiSummary {
                    protocol: api.protocol.to_string(),
                    name: api.name,
                    id: api.id,
                    endpoint: api.endpoint,
                })
                .collect(),
        });
        Ok(findings.finish(NAME, ComponentKind::ApiGateway, ok_message, details))
    }
}
