//! 실행 컨텍스트: 환경, 리전, 도메인
//!
//! 실행 시작 시 한 번 만들어지고 이후 읽기 전용으로 모든 프로브가 공유합니다.

use serde::{Deserialize, Serialize};

use crate::config::TargetConfig;

/// 한 번의 헬스 체크 실행 컨텍스트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    /// 환경 이름 (예: `"dev"`)
    pub environment: String,
    /// 클라우드 리전
    pub region: String,
    /// 애플리케이션 도메인
    pub domain: String,
    /// 리소스 이름에 쓰이는 애플리케이션 식별자 (예: `"amplify"`)
    pub app: String,
}

impl RunContext {
    /// 컨텍스트를 생성합니다.
    pub fn new(
        environment: impl Into<String>,
        region: impl Into<String>,
        domain: impl Into<String>,
        app: impl Into<String>,
    ) -> Self {
        Self {
            environment: environment.into(),
            region: region.into(),
            domain: domain.into(),
            app: app.into(),
        }
    }

    /// 설정의 `[target]` 섹션에서 컨텍스트를 만듭니다.
    pub fn from_target(target: &TargetConfig) -> Self {
        Self::new(
            target.environment.clone(),
            target.region.clone(),
            target.domain.clone(),
            target.app.clone(),
        )
    }

    /// `{environment}-{app}-{suffix}` 형식의 리소스 이름을 만듭니다.
    pub fn resource_name(&self, suffix: &str) -> String {
        format!("{}-{}-{}", self.environment, self.app, suffix)
    }

    /// 템플릿의 `{env}`, `{app}` 자리표시자를 치환합니다.
    pub fn expand(&self, template: &str) -> String {
        template
            .replace("{env}", &self.environment)
            .replace("{app}", &self.app)
    }
}
