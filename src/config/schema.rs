//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the TOML file.
//! Every section has defaults so a run can be configured from CLI flags alone.

use crate::config::SecretString;
use crate::core::mutate::StatusFilter;
use serde::{Deserialize, Serialize};

/// Main jamf-batch configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JamfBatchConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// JSS server connection
    #[serde(default)]
    pub server: ServerConfig,

    /// Batch execution settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl JamfBatchConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first invalid value found.
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.server.validate()?;
        self.batch.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// JSS server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the JSS, e.g. `https://sub.jamfcloud.com`
    #[serde(default)]
    pub base_url: String,

    /// API username
    #[serde(default)]
    pub username: Option<String>,

    /// API password
    /// Stored securely in memory and zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification
    ///
    /// Only disable for test servers with self-signed certificates.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.base_url.is_empty() {
            return Err("server.base_url cannot be empty (use --url)".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("server.base_url must start with http:// or https://".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("server.base_url '{}' is not a valid URL", self.base_url));
        }

        if self.username.as_ref().map(|s| s.is_empty()).unwrap_or(true) {
            return Err("server.username cannot be empty (use --user)".to_string());
        }

        if self
            .password
            .as_ref()
            .map(|s| s.expose_secret().is_empty())
            .unwrap_or(true)
        {
            return Err("server.password cannot be empty (use --pass)".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("server.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: None,
            password: None,
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
        }
    }
}

/// Batch execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of resources processed concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Directory receiving `.backup` files
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,

    /// Command status flushed by the flush-commands job
    #[serde(default)]
    pub status_filter: StatusFilter,

    /// Fetch and snapshot but skip mutations
    #[serde(default)]
    pub dry_run: bool,
}

impl BatchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 || self.concurrency > 16 {
            return Err(format!(
                "batch.concurrency must be between 1 and 16, got {}",
                self.concurrency
            ));
        }

        if self.backup_dir.trim().is_empty() {
            return Err("batch.backup_dir cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            backup_dir: default_backup_dir(),
            status_filter: StatusFilter::default(),
            dry_run: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_concurrency() -> usize {
    4
}

fn default_backup_dir() -> String {
    ".".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn valid_server() -> ServerConfig {
        ServerConfig {
            base_url: "https://sub.jamfcloud.com".to_string(),
            username: Some("api".to_string()),
            password: Some(secret_string("secret".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_values() {
        let config = JamfBatchConfig::default();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.server.timeout_seconds, 60);
        assert!(config.server.tls_verify);
        assert_eq!(config.batch.concurrency, 4);
        assert_eq!(config.batch.backup_dir, ".");
        assert_eq!(config.batch.status_filter, StatusFilter::Failed);
        assert!(!config.logging.local_enabled);
    }

    #[test]
    fn test_default_config_requires_server() {
        let err = JamfBatchConfig::default().validate().unwrap_err();
        assert!(err.contains("base_url"));
    }

    #[test]
    fn test_server_config_validation() {
        assert!(valid_server().validate().is_ok());

        let mut server = valid_server();
        server.base_url = "sub.jamfcloud.com".to_string();
        assert!(server.validate().is_err());

        let mut server = valid_server();
        server.username = Some(String::new());
        assert!(server.validate().unwrap_err().contains("username"));

        let mut server = valid_server();
        server.password = None;
        assert!(server.validate().unwrap_err().contains("password"));
    }

    #[test]
    fn test_batch_config_validation() {
        let mut batch = BatchConfig::default();
        assert!(batch.validate().is_ok());

        batch.concurrency = 0;
        assert!(batch.validate().is_err());

        batch.concurrency = 17;
        assert!(batch.validate().is_err());
    }

    #[test]
    fn test_application_config_validation() {
        let config = ApplicationConfig {
            log_level: "verbose".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }
}
