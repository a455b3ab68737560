//! 설정 관리: stackpulse.toml 파싱 및 런타임 설정
//!
//! [`StackpulseConfig`]는 모든 섹션의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`STACKPULSE_TARGET_ENVIRONMENT=prod` 형식)
//! 3. 설정 파일 (`stackpulse.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), stackpulse_core::error::StackpulseError> {
//! use stackpulse_core::config::StackpulseConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = StackpulseConfig::load("stackpulse.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = StackpulseConfig::parse("[target]\nenvironment = \"prod\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::ExecutionMode;
use crate::error::{ConfigError, StackpulseError};

/// Stackpulse 통합 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackpulseConfig {
    /// 일반 설정 (로깅)
    #[serde(default)]
    pub general: GeneralConfig,
    /// 검사 대상 환경
    #[serde(default)]
    pub target: TargetConfig,
    /// 엔진 설정
    #[serde(default)]
    pub engine: EngineSection,
    /// 리소스 이름 템플릿
    #[serde(default)]
    pub naming: NamingConfig,
    /// 리포트 출력 설정
    #[serde(default)]
    pub report: ReportConfig,
    /// watch 모드 설정
    #[serde(default)]
    pub watch: WatchConfig,
    /// Prometheus 익스포터 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl StackpulseConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StackpulseError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 기본값에서 시작합니다. 환경변수 오버라이드는 항상 적용됩니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, StackpulseError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(StackpulseError::Config(ConfigError::FileNotFound { .. })) => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, StackpulseError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StackpulseError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                StackpulseError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, StackpulseError> {
        toml::from_str(toml_str).map_err(|e| {
            StackpulseError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `STACKPULSE_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "STACKPULSE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "STACKPULSE_GENERAL_LOG_FORMAT");

        // Target
        override_string(
            &mut self.target.environment,
            "STACKPULSE_TARGET_ENVIRONMENT",
        );
        override_string(&mut self.target.region, "STACKPULSE_TARGET_REGION");
        override_string(&mut self.target.domain, "STACKPULSE_TARGET_DOMAIN");
        override_string(&mut self.target.app, "STACKPULSE_TARGET_APP");
        override_string(
            &mut self.target.inventory_path,
            "STACKPULSE_TARGET_INVENTORY_PATH",
        );

        // Engine
        override_parse(&mut self.engine.mode, "STACKPULSE_ENGINE_MODE");
        override_parse(
            &mut self.engine.probe_timeout_secs,
            "STACKPULSE_ENGINE_PROBE_TIMEOUT_SECS",
        );

        // Naming
        override_csv(
            &mut self.naming.function_prefixes,
            "STACKPULSE_NAMING_FUNCTION_PREFIXES",
        );
        override_csv(
            &mut self.naming.table_patterns,
            "STACKPULSE_NAMING_TABLE_PATTERNS",
        );

        // Report
        override_parse(&mut self.report.save, "STACKPULSE_REPORT_SAVE");
        override_string(&mut self.report.output_dir, "STACKPULSE_REPORT_OUTPUT_DIR");
        override_string(&mut self.report.file_prefix, "STACKPULSE_REPORT_FILE_PREFIX");
        override_parse(&mut self.report.top_issues, "STACKPULSE_REPORT_TOP_ISSUES");

        // Watch
        override_parse(&mut self.watch.refresh_secs, "STACKPULSE_WATCH_REFRESH_SECS");

        // Metrics
        override_parse(&mut self.metrics.enabled, "STACKPULSE_METRICS_ENABLED");
        override_string(
            &mut self.metrics.listen_addr,
            "STACKPULSE_METRICS_LISTEN_ADDR",
        );
        override_parse(&mut self.metrics.port, "STACKPULSE_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), StackpulseError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.target.environment.trim().is_empty() {
            return Err(invalid("target.environment", "must not be empty"));
        }
        if self.target.region.trim().is_empty() {
            return Err(invalid("target.region", "must not be empty"));
        }
        if self.target.app.trim().is_empty() {
            return Err(invalid("target.app", "must not be empty"));
        }

        if self.engine.probe_timeout_secs == 0 {
            return Err(invalid("engine.probe_timeout_secs", "must be greater than 0"));
        }

        if self.report.file_prefix.trim().is_empty() {
            return Err(invalid("report.file_prefix", "must not be empty"));
        }
        if self.report.top_issues == 0 {
            return Err(invalid("report.top_issues", "must be greater than 0"));
        }

        if self.watch.refresh_secs == 0 {
            return Err(invalid("watch.refresh_secs", "must be greater than 0"));
        }

        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(invalid(
                "metrics.port",
                "must be non-zero when metrics are enabled",
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> StackpulseError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 검사 대상 환경 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// 환경 이름
    pub environment: String,
    /// 클라우드 리전
    pub region: String,
    /// 공개 도메인 (웹 엔드포인트 검사 대상)
    pub domain: String,
    /// 리소스 이름에 쓰이는 애플리케이션 식별자
    pub app: String,
    /// 클라우드 인벤토리 스냅샷 경로
    pub inventory_path: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            environment: "dev".to_owned(),
            region: "us-east-1".to_owned(),
            domain: "app.example.com".to_owned(),
            app: "amplify".to_owned(),
            inventory_path: "inventory.json".to_owned(),
        }
    }
}

/// 엔진 설정 섹션
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// 실행 방식 (sequential, concurrent)
    pub mode: ExecutionMode,
    /// 프로브 기본 타임아웃 (초)
    pub probe_timeout_secs: u64,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Concurrent,
            probe_timeout_secs: 10,
        }
    }
}

/// 리소스 이름 템플릿
///
/// `{env}`와 `{app}` 자리표시자는 실행 컨텍스트로 치환됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// 함수 이름 접두어
    pub function_prefixes: Vec<String>,
    /// 테이블 이름에 포함되어야 하는 패턴
    pub table_patterns: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        let function_prefixes = [
            "{env}-{app}-lambda",
            "{env}-{app}-assistants",
            "{env}-{app}-lambda-admin",
            "{env}-{app}-lambda-api",
            "{env}-{app}-lambda-artifacts",
            "{env}-{app}-lambda-js",
            "{env}-{app}-lambda-ops",
            "{env}-{app}-lambda-optimizer",
            "{env}-chat-billing",
            "{env}-data-disclosure",
            "{env}-{app}-embedding",
            "{env}-{app}-object-access",
        ];
        let table_patterns = [
            "{env}-{app}",
            "{env}-chat",
            "{env}-conversations",
            "{env}-user",
            "{env}-assistant",
            "{env}-billing",
        ];
        Self {
            function_prefixes: function_prefixes.iter().map(|s| (*s).to_owned()).collect(),
            table_patterns: table_patterns.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

/// 리포트 출력 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 실행마다 JSON 리포트 저장
    pub save: bool,
    /// 리포트 저장 디렉토리
    pub output_dir: String,
    /// 리포트 파일 이름 접두어
    pub file_prefix: String,
    /// 요약에 표시할 상위 오류 수
    pub top_issues: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            save: false,
            output_dir: ".".to_owned(),
            file_prefix: "health_check_report".to_owned(),
            top_issues: crate::summary::DEFAULT_TOP_ISSUES,
        }
    }
}

/// watch 모드 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// 갱신 주기 (초)
    pub refresh_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { refresh_secs: 30 }
    }
}

/// Prometheus 익스포터 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 수신 주소
    pub listen_addr: String,
    /// 수신 포트
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9464,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_parse<T: FromStr>(target: &mut T, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<T>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                expected = std::any::type_name::<T>(),
                "failed to parse env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
