//! Configuration management for jamf-batch.
//!
//! Configuration comes from three layers, later layers winning:
//!
//! 1. An optional TOML file (`--config`), with `${VAR_NAME}` substitution
//! 2. `JAMF_BATCH_<SECTION>_<KEY>` environment variables
//! 3. Command-line flags (`--url`, `--user`, `--pass`, ...)
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [server]
//! base_url = "https://sub.jamfcloud.com"
//! username = "api_user"
//! password = "${JAMF_API_PASSWORD}"
//!
//! [batch]
//! concurrency = 4
//! backup_dir = "./backups"
//! status_filter = "Failed"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_or_default};
pub use schema::{ApplicationConfig, BatchConfig, JamfBatchConfig, LoggingConfig, ServerConfig};
pub use secret::{secret_string, SecretString, SecretValue};
