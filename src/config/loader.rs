//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::JamfBatchConfig;
use super::secret::secret_string;
use crate::domain::errors::BatchError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Substitutes `${VAR}` placeholders from the environment
/// 3. Parses the TOML into [`JamfBatchConfig`]
/// 4. Applies `JAMF_BATCH_*` environment overrides
///
/// Validation is left to the caller because CLI flags are usually applied
/// on top of the file before the configuration is complete.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a referenced
/// environment variable is not set.
///
/// # Examples
///
/// ```no_run
/// use jamf_batch::config::loader::load_config;
///
/// let config = load_config("jamf-batch.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<JamfBatchConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BatchError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BatchError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: JamfBatchConfig = toml::from_str(&contents)
        .map_err(|e| BatchError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    Ok(config)
}

/// Loads the file when a path is given, otherwise starts from defaults
/// with environment overrides applied
pub fn load_config_or_default(path: Option<&str>) -> Result<JamfBatchConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = JamfBatchConfig::default();
            apply_env_overrides(&mut config);
            Ok(config)
        }
    }
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied verbatim.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_regex();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(BatchError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the JAMF_BATCH_ prefix
///
/// Variables follow the pattern `JAMF_BATCH_<SECTION>_<KEY>`, for example
/// `JAMF_BATCH_SERVER_BASE_URL`.
fn apply_env_overrides(config: &mut JamfBatchConfig) {
    if let Ok(val) = std::env::var("JAMF_BATCH_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("JAMF_BATCH_SERVER_BASE_URL") {
        config.server.base_url = val;
    }
    if let Ok(val) = std::env::var("JAMF_BATCH_SERVER_USERNAME") {
        config.server.username = Some(val);
    }
    if let Ok(val) = std::env::var("JAMF_BATCH_SERVER_PASSWORD") {
        config.server.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("JAMF_BATCH_SERVER_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.server.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("JAMF_BATCH_SERVER_TLS_VERIFY") {
        config.server.tls_verify = val.parse().unwrap_or(true);
    }

    if let Ok(val) = std::env::var("JAMF_BATCH_BATCH_CONCURRENCY") {
        if let Ok(concurrency) = val.parse() {
            config.batch.concurrency = concurrency;
        }
    }
    if let Ok(val) = std::env::var("JAMF_BATCH_BATCH_BACKUP_DIR") {
        config.batch.backup_dir = val;
    }
    if let Ok(val) = std::env::var("JAMF_BATCH_BATCH_STATUS_FILTER") {
        match val.parse() {
            Ok(filter) => config.batch.status_filter = filter,
            Err(e) => tracing::warn!(value = %val, error = %e, "Ignoring invalid status filter override"),
        }
    }
    if let Ok(val) = std::env::var("JAMF_BATCH_BATCH_DRY_RUN") {
        config.batch.dry_run = val.parse().unwrap_or(false);
    }

    if let Ok(val) = std::env::var("JAMF_BATCH_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("JAMF_BATCH_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
