use std::path::PathBuf;

use tracing_appender::rolling::{Builder as RollingBuilder, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{EnvironmentProvider, SystemEnvironment};

/// Configuration for application logging
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub log_level: String,
    pub app_log_file: Option<PathBuf>,
    pub app_log_retention_days: usize,
}

impl LoggingConfig {
    /// Load logging configuration from the given environment
    ///
    /// `LOG_LEVEL` accepts any `EnvFilter` directive (default `info`).
    /// `APP_LOG_FILE` enables a daily-rotated file; `APP_LOG_RETENTION_DAYS`
    /// bounds how many rotated files are kept (default 7).
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Self {
        let log_level = env.get_var("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let app_log_file = env
            .get_var("APP_LOG_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let app_log_retention_days = env
            .get_var("APP_LOG_RETENTION_DAYS")
            .and_then(|v| v.parse().ok())
            .filter(|days| *days > 0)
            .unwrap_or(7);

        Self {
            log_level,
            app_log_file,
            app_log_retention_days,
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_provider(&SystemEnvironment)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("File system error: {0}")]
    FileSystemError(#[from] std::io::Error),
}

fn env_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidLogLevel(format!("{}: {}", level, e)))
}

/// Initialize the tracing subscriber with console and optional file output
///
/// Reads configuration from environment variables.
pub fn init_logging() -> Result<(), LoggingError> {
    init_logging_with(&LoggingConfig::from_env())
}

/// Initialize the tracing subscriber from an explicit configuration
pub fn init_logging_with(config: &LoggingConfig) -> Result<(), LoggingError> {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter(&config.log_level)?);

    let subscriber = tracing_subscriber::registry().with(console_layer);

    if let Some(log_file_path) = &config.app_log_file {
        let directory = log_file_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| std::path::Path::new("."));
        std::fs::create_dir_all(directory)?;

        let prefix = log_file_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| LoggingError::InitializationError("Invalid log file path".to_string()))?;

        let file_appender = RollingBuilder::new()
            .rotation(Rotation::DAILY)
            .filename_prefix(prefix)
            .max_log_files(config.app_log_retention_days)
            .build(directory)
            .map_err(|e| LoggingError::InitializationError(e.to_string()))?;

        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter(&config.log_level)?);

        subscriber
            .with(file_layer)
            .try_init()
            .map_err(|e| LoggingError::InitializationError(e.to_string()))?;
    } else {
        subscriber
            .try_init()
            .map_err(|e| LoggingError::InitializationError(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_logging_defaults() {
        let config = LoggingConfig::from_env_provider(&MockEnvironment::empty());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.app_log_file, None);
        assert_eq!(config.app_log_retention_days, 7);
    }

    #[test]
    fn test_logging_from_environment() {
        let env = MockEnvironment::empty().with_vars(&[
            ("LOG_LEVEL", "report_access=debug,sea_orm=warn"),
            ("APP_LOG_FILE", "logs/app.log"),
            ("APP_LOG_RETENTION_DAYS", "30"),
        ]);
        let config = LoggingConfig::from_env_provider(&env);

        assert_eq!(config.log_level, "report_access=debug,sea_orm=warn");
        assert_eq!(config.app_log_file, Some(PathBuf::from("logs/app.log")));
        assert_eq!(config.app_log_retention_days, 30);
    }

    #[test]
    fn test_invalid_retention_falls_back() {
        let env = MockEnvironment::empty().with_var("APP_LOG_RETENTION_DAYS", "zero");
        assert_eq!(LoggingConfig::from_env_provider(&env).app_log_retention_days, 7);
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        assert!(matches!(
            env_filter("info,=[bad"),
            Err(LoggingError::InvalidLogLevel(_))
        ));
    }
}
