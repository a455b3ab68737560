//! stackpulse.toml 통합 설정 테스트
//!
//! - stackpulse.toml.example 파싱 테스트
//! - 파일 로딩 / 파일 없음 처리
//! - 환경변수 우선순위 테스트
//! - 잘못된 값 검증 에러 테스트

use std::io::Write;

use serial_test::serial;
use stackpulse_core::config::StackpulseConfig;
use stackpulse_core::engine::ExecutionMode;
use stackpulse_core::error::{ConfigError, StackpulseError};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

// =============================================================================
// stackpulse.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../stackpulse.toml.example");
    let config = StackpulseConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.target.environment, "dev");
    assert_eq!(config.engine.mode, ExecutionMode::Concurrent);
}

#[test]
fn example_config_matches_defaults() {
    let content = include_str!("../../../stackpulse.toml.example");
    let config = StackpulseConfig::parse(content).expect("should parse");
    assert_eq!(
        config,
        StackpulseConfig::default(),
        "example file should document the defaults"
    );
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../stackpulse.toml.example");
    let config = StackpulseConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

// =============================================================================
// 파일 로딩
// =============================================================================

#[tokio::test]
#[serial]
async fn load_reads_file_and_validates() {
    // Given: 일부 섹션만 있는 설정 파일
    let file = write_config(
        r#"
[target]
environment = "staging"
region = "eu-west-1"

[report]
top_issues = 3
"#,
    );

    // When
    let config = StackpulseConfig::load(file.path()).await.expect("should load");

    // Then
    assert_eq!(config.target.environment, "staging");
    assert_eq!(config.target.region, "eu-west-1");
    assert_eq!(config.report.top_issues, 3);
    assert_eq!(config.watch.refresh_secs, 30, "unset sections keep defaults");
}

#[tokio::test]
#[serial]
async fn load_rejects_invalid_values() {
    let file = write_config("[engine]\nprobe_timeout_secs = 0\n");
    let err = StackpulseConfig::load(file.path()).await.unwrap_err();
    assert!(matches!(
        err,
        StackpulseError::Config(ConfigError::InvalidValue { ref field, .. })
            if field == "engine.probe_timeout_secs"
    ));
}

#[tokio::test]
#[serial]
async fn load_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = StackpulseConfig::load(dir.path().join("missing.toml"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StackpulseError::Config(ConfigError::FileNotFound { .. })
    ));
}

#[tokio::test]
#[serial]
async fn load_or_default_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = StackpulseConfig::load_or_default(dir.path().join("missing.toml"))
        .await
        .expect("missing file falls back to defaults");
    assert_eq!(config, StackpulseConfig::default());
}

#[tokio::test]
#[serial]
async fn load_or_default_still_reports_parse_errors() {
    let file = write_config("[target\nenvironment = ");
    let err = StackpulseConfig::load_or_default(file.path())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StackpulseError::Config(ConfigError::ParseFailed { .. })
    ));
}

// =============================================================================
// 환경변수 우선순위
// =============================================================================

#[tokio::test]
#[serial]
async fn env_overrides_take_priority_over_file() {
    // Given: 파일은 staging, 환경변수는 prod
    let file = write_config("[target]\nenvironment = \"staging\"\n\n[engine]\nmode = \"concurrent\"\n");
    // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
    unsafe {
        std::env::set_var("STACKPULSE_TARGET_ENVIRONMENT", "prod");
        std::env::set_var("STACKPULSE_ENGINE_MODE", "sequential");
        std::env::set_var("STACKPULSE_NAMING_TABLE_PATTERNS", "{env}-orders, {env}-users");
    }

    // When
    let result = StackpulseConfig::load(file.path()).await;

    unsafe {
        std::env::remove_var("STACKPULSE_TARGET_ENVIRONMENT");
        std::env::remove_var("STACKPULSE_ENGINE_MODE");
        std::env::remove_var("STACKPULSE_NAMING_TABLE_PATTERNS");
    }

    // Then
    let config = result.expect("should load");
    assert_eq!(config.target.environment, "prod");
    assert_eq!(config.engine.mode, ExecutionMode::Sequential);
    assert_eq!(config.naming.table_patterns, vec!["{env}-orders", "{env}-users"]);
}

#[tokio::test]
#[serial]
async fn unparsable_env_value_is_ignored() {
    let file = write_config("[watch]\nrefresh_secs = 15\n");
    // SAFETY: serial 테스트에서만 환경변수를 조작합니다.
    unsafe { std::env::set_var("STACKPULSE_WATCH_REFRESH_SECS", "soon") };

    let result = StackpulseConfig::load(file.path()).await;

    unsafe { std::env::remove_var("STACKPULSE_WATCH_REFRESH_SECS") };

    let config = result.expect("should load");
    assert_eq!(config.watch.refresh_secs, 15, "file value kept");
}
