///! Logging configuration module
///! Sets up console logging and optional rolling JSON file logs

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use std::io;
use std::path::PathBuf;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,               // log level (trace, debug, info, warn, error)
    pub file_path: Option<PathBuf>,  // log directory
    pub rotation: LogRotation,       // log rotation policy
}

/// Log rotation policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            rotation: LogRotation::Daily,
        }
    }
}

impl From<&crate::config::LoggingConfig> for LoggingConfig {
    fn from(config: &crate::config::LoggingConfig) -> Self {
        Self {
            level: config.level.clone(),
            file_path: config
                .file_logging_enabled
                .then(|| config.log_dir.clone()),
            rotation: config.rotation,
        }
    }
}

impl LoggingConfig {
    /// Initialize logging based on configuration.
    ///
    /// The returned guard flushes the file writer and must be held for the
    /// lifetime of the program when file logging is enabled.
    pub fn init(&self) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.level));

        // Logs go to stderr so command output stays machine readable
        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
            .with_writer(io::stderr);

        let guard = if let Some(ref path) = self.file_path {
            let file_appender = match self.rotation {
                LogRotation::Hourly => rolling::hourly(path, "proxbridge.log"),
                LogRotation::Daily => rolling::daily(path, "proxbridge.log"),
                LogRotation::Never => rolling::never(path, "proxbridge.log"),
            };

            let (non_blocking, guard) = non_blocking(file_appender);

            let file_layer = fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_writer(non_blocking);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()?;

            Some(guard)
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .try_init()?;

            None
        };

        tracing::debug!("Logging initialized - level: {}", self.level);

        Ok(guard)
    }
}

/// Log VM operation with context
#[macro_export]
macro_rules! log_vm_operation {
    ($op:expr, $uuid:expr) => {
        tracing::info!(
            operation = $op,
            uuid = tracing::field::display(&$uuid),
            "VM operation"
        )
    };
    ($op:expr, $uuid:expr, $($key:ident = $value:expr),+) => {
        tracing::info!(
            operation = $op,
            uuid = tracing::field::display(&$uuid),
            $($key = $value),+,
            "VM operation"
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.file_path.is_none());
        assert_eq!(config.rotation, LogRotation::Daily);
    }

    #[test]
    fn test_from_settings() {
        let mut settings = crate::config::LoggingConfig::default();
        assert!(LoggingConfig::from(&settings).file_path.is_none());

        settings.file_logging_enabled = true;
        settings.level = "debug".to_string();
        settings.rotation = LogRotation::Hourly;
        let config = LoggingConfig::from(&settings);
        assert_eq!(config.level, "debug");
        assert_eq!(config.file_path, Some(PathBuf::from("/var/log/proxbridge")));
        assert_eq!(config.rotation, LogRotation::Hourly);
    }
}
