//! Configuration Loader
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml / config.local.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;
use crate::domain::manga::ScoreFloor;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 表单会话闲置上限（一年）
const MAX_SESSION_IDLE_SECS: u64 = 365 * 24 * 60 * 60;

/// 加载应用配置
///
/// 环境变量前缀 `MANGALOG_`，层级分隔符 `__`：
/// - `MANGALOG_SERVER__PORT=8080`
/// - `MANGALOG_DATABASE__PATH=/data/mangalog.db`
/// - `MANGALOG_FORM__SCORE_MIN=1`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定文件加载配置，`None` 时搜索默认文件名
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("database.path", "data/mangalog.db")?
        .set_default("database.max_connections", 5)?
        .set_default("books.url", "https://www.googleapis.com/books/v1/volumes")?
        .set_default("books.timeout_secs", 10)?
        .set_default("books.max_results", 20)?
        .set_default("form.score_min", 0)?
        .set_default("form.chapter_precision", "decimal")?
        .set_default("form.redirect_delay_ms", 1500)?
        .set_default("form.submit_timeout_secs", 30)?
        .set_default("form.session_idle_secs", 1800)?
        .set_default("form.sweep_interval_secs", 60)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    match config_path {
        Some(path) => builder = builder.add_source(File::from(path).required(true)),
        None => {
            for name in CONFIG_FILE_NAMES {
                builder = builder.add_source(File::with_name(name).required(false));
            }
        }
    }

    // 例如 MANGALOG_BOOKS__URL=http://localhost:9000/volumes
    builder = builder.add_source(
        Environment::with_prefix("MANGALOG")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let app_config: AppConfig = builder.build()?.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;
    Ok(app_config)
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("Server port cannot be 0"));
    }
    if config.books.url.trim().is_empty() {
        return Err(invalid("Books URL cannot be empty"));
    }
    if config.database.path.trim().is_empty() {
        return Err(invalid("Database path cannot be empty"));
    }
    ScoreFloor::try_from(config.form.score_min).map_err(ConfigError::ValidationError)?;
    if config.form.submit_timeout_secs == 0 {
        return Err(invalid("Form submit timeout cannot be 0"));
    }
    if config.form.sweep_interval_secs == 0 {
        return Err(invalid("Form sweep interval cannot be 0"));
    }
    if config.form.session_idle_secs == 0 || config.form.session_idle_secs > MAX_SESSION_IDLE_SECS {
        return Err(ConfigError::ValidationError(format!(
            "Form session idle timeout must be between 1 and {} seconds",
            MAX_SESSION_IDLE_SECS
        )));
    }
    if config.auth.tokens.iter().any(|t| t.token.is_empty() || t.user_id.is_empty()) {
        return Err(invalid("Auth tokens need both token and user_id"));
    }
    Ok(())
}

/// 打印配置信息（启动日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!("Books URL: {}", config.books.url);
    tracing::info!("Books Timeout: {}s", config.books.timeout_secs);
    tracing::info!(
        "Form Rules: score_min={}, chapter_precision={:?}",
        config.form.score_min,
        config.form.chapter_precision
    );
    tracing::info!("Form Session Idle: {}s", config.form.session_idle_secs);
    tracing::info!("Auth Tokens: {}", config.auth.tokens.len());
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manga::ChapterPrecision;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.form.redirect_delay_ms, 1500);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
[server]
port = 8088

[form]
score_min = 1
chapter_precision = "whole"

[[auth.tokens]]
token = "dev-token"
user_id = "u1"
name = "Dev"
"#,
        );

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.database.path, "data/mangalog.db");
        assert_eq!(config.form.rules().score_floor, ScoreFloor::One);
        assert_eq!(config.form.chapter_precision, ChapterPrecision::Whole);
        assert_eq!(config.auth.tokens.len(), 1);
        assert_eq!(config.auth.tokens[0].user_id, "u1");
    }

    #[test]
    fn test_rejects_bad_score_min() {
        let file = write_config("[form]\nscore_min = 3\n");
        let err = load_config_from_path(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_out_of_range_session_idle() {
        let file = write_config("[form]\nsession_idle_secs = 9300000000000000\n");
        let err = load_config_from_path(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let mut config = AppConfig::default();
        config.form.session_idle_secs = 0;
        assert!(validate_config(&config).is_err());

        config.form.session_idle_secs = MAX_SESSION_IDLE_SECS;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(load_config_from_path(Some(&missing)).is_err());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.books.url = " ".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.form.submit_timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
