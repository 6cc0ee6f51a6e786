//! Configuration management for Proxbridge
//!
//! This module provides a centralized configuration system that loads settings from:
//! 1. Environment variables (highest priority)
//! 2. Configuration file (TOML format)
//! 3. Default values (lowest priority)

use crate::logging::LogRotation;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration struct for Proxbridge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxbridgeConfig {
    /// Proxmox connection settings
    pub connection: ConnectionConfig,
    /// Defaults applied when building guest attributes
    pub defaults: DefaultsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Proxmox compute resource connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// API endpoint (e.g., "https://pve.example.com:8006/api2/json")
    pub url: String,
    /// User in `name@realm` form
    pub user: String,
    /// Password for the user
    #[serde(default)]
    pub password: String,
    /// Verify the hypervisor's TLS certificate
    pub ssl_verify_peer: bool,
}

/// Defaults for guest attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Cluster node new guests are placed on
    pub node: String,
    /// Bridge for NICs created from host interfaces
    pub bridge: String,
    /// Qemu NIC model for NICs created from host interfaces
    pub nic_model: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Enable file logging
    pub file_logging_enabled: bool,
    /// Log file rotation (hourly, daily, never)
    #[serde(default)]
    pub rotation: LogRotation,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: "https://localhost:8006/api2/json".to_string(),
            user: "root@pam".to_string(),
            password: String::new(),
            ssl_verify_peer: true,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            node: "pve".to_string(),
            bridge: "vmbr0".to_string(),
            nic_model: "virtio".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("/var/log/proxbridge"),
            file_logging_enabled: false,
            rotation: LogRotation::Daily,
        }
    }
}

impl ProxbridgeConfig {
    /// Load configuration from environment variables and optional config file.
    ///
    /// A config file that exists but cannot be read or parsed is an error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_layered(Self::find_config_file().as_ref())
    }

    /// Defaults, then the file at `path` if any, then environment overrides
    fn load_layered(path: Option<&PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.clone(), e.to_string()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    pub fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("PROXBRIDGE_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/proxbridge/config.toml")),
            Some(PathBuf::from("./proxbridge.toml")),
        ];

        paths.into_iter()
            .flatten()
            .find(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Connection
        if let Ok(url) = std::env::var("PROXBRIDGE_URL") {
            self.connection.url = url;
        }
        if let Ok(user) = std::env::var("PROXBRIDGE_USER") {
            self.connection.user = user;
        }
        if let Ok(password) = std::env::var("PROXBRIDGE_PASSWORD") {
            self.connection.password = password;
        }
        if let Ok(verify) = std::env::var("PROXBRIDGE_SSL_VERIFY_PEER") {
            self.connection.ssl_verify_peer = verify.parse().unwrap_or(true);
        }

        // Defaults
        if let Ok(node) = std::env::var("PROXBRIDGE_NODE") {
            self.defaults.node = node;
        }
        if let Ok(bridge) = std::env::var("PROXBRIDGE_BRIDGE") {
            self.defaults.bridge = bridge;
        }
        if let Ok(model) = std::env::var("PROXBRIDGE_NIC_MODEL") {
            self.defaults.nic_model = model;
        }

        // Logging
        if let Ok(level) = std::env::var("PROXBRIDGE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(path) = std::env::var("PROXBRIDGE_LOG_DIR") {
            self.logging.log_dir = PathBuf::from(path);
        }
        if let Ok(enabled) = std::env::var("PROXBRIDGE_FILE_LOGGING") {
            self.logging.file_logging_enabled = enabled.parse().unwrap_or(false);
        }
        if let Ok(rotation) = std::env::var("PROXBRIDGE_LOG_ROTATION") {
            self.logging.rotation = match rotation.to_lowercase().as_str() {
                "hourly" => LogRotation::Hourly,
                "never" => LogRotation::Never,
                _ => LogRotation::Daily,
            };
        }
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.connection.validate()?;

        if self.defaults.node.is_empty() {
            return Err(ConfigError::Validation("Default node cannot be empty".to_string()));
        }

        if self.defaults.bridge.is_empty() {
            return Err(ConfigError::Validation("Default bridge cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl ConnectionConfig {
    /// Check url, user and password of the compute resource
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_connection(&self.url, &self.user, &self.password)
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Failed to read configuration file
    FileRead(PathBuf, String),
    /// Failed to parse configuration
    Parse(String),
    /// Configuration validation failed
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileRead(path, err) => {
                write!(f, "Failed to read config file {:?}: {}", path, err)
            }
            ConfigError::Parse(err) => write!(f, "Failed to parse config: {}", err),
            ConfigError::Validation(err) => write!(f, "Config validation failed: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ProxbridgeConfig::default();
        assert_eq!(config.connection.user, "root@pam");
        assert_eq!(config.defaults.node, "pve");
        assert_eq!(config.defaults.bridge, "vmbr0");
        assert_eq!(config.defaults.nic_model, "virtio");
        assert!(!config.logging.file_logging_enabled);
    }

    #[test]
    fn test_config_validation() {
        // No password by default
        let config = ProxbridgeConfig::default();
        assert!(config.validate().is_err());

        let mut valid = ProxbridgeConfig::default();
        valid.connection.password = "secret".to_string();
        assert!(valid.validate().is_ok());

        let mut bad_user = valid.clone();
        bad_user.connection.user = "root".to_string();
        assert!(bad_user.validate().is_err());

        let mut bad_url = valid.clone();
        bad_url.connection.url = "a".to_string();
        assert!(bad_url.validate().is_err());

        let mut no_node = valid;
        no_node.defaults.node = String::new();
        assert!(no_node.validate().is_err());
    }

    #[test]
    fn test_generate_sample_config() {
        let sample = ProxbridgeConfig::generate_sample();
        assert!(sample.contains("[connection]"));
        assert!(sample.contains("[defaults]"));
        assert!(sample.contains("[logging]"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[connection]
url = "https://pve.example.com:8006/api2/json"
user = "foreman@pve"
password = "secret"
ssl_verify_peer = false

[defaults]
node = "pve2"
bridge = "vmbr1"
nic_model = "e1000"

[logging]
level = "debug"
log_dir = "/tmp/proxbridge"
file_logging_enabled = true
rotation = "hourly"
"#
        )
        .unwrap();

        let config = ProxbridgeConfig::load_from_file(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.connection.user, "foreman@pve");
        assert!(!config.connection.ssl_verify_peer);
        assert_eq!(config.defaults.node, "pve2");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.rotation, LogRotation::Hourly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rotation_defaults_to_daily() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[connection]
url = "https://pve.example.com:8006/api2/json"
user = "root@pam"
ssl_verify_peer = true

[defaults]
node = "pve"
bridge = "vmbr0"
nic_model = "virtio"

[logging]
level = "info"
log_dir = "/var/log/proxbridge"
file_logging_enabled = false
"#
        )
        .unwrap();

        let config = ProxbridgeConfig::load_from_file(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.logging.rotation, LogRotation::Daily);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[connection\nurl = \"broken").unwrap();

        let err = ProxbridgeConfig::load_layered(Some(&file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_layers_file_under_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[connection]
url = "https://pve.example.com:8006/api2/json"
user = "foreman@pve"
password = "secret"
ssl_verify_peer = true

[defaults]
node = "pve2"
bridge = "vmbr1"
nic_model = "virtio"

[logging]
level = "info"
log_dir = "/var/log/proxbridge"
file_logging_enabled = false
"#
        )
        .unwrap();

        std::env::set_var("PROXBRIDGE_NIC_MODEL", "e1000");
        let config = ProxbridgeConfig::load_layered(Some(&file.path().to_path_buf()));
        std::env::remove_var("PROXBRIDGE_NIC_MODEL");

        let config = config.unwrap();
        assert_eq!(config.defaults.node, "pve2");
        assert_eq!(config.defaults.bridge, "vmbr1");
        assert_eq!(config.defaults.nic_model, "e1000");
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = ProxbridgeConfig::load_from_file(&PathBuf::from("/nonexistent/proxbridge.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_, _)));
    }
}
