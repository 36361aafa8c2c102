//! Integration tests for configuration loading

use jamf_batch::config::load_config;
use jamf_batch::core::mutate::StatusFilter;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Tests touching process environment variables run one at a time
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const FULL_CONFIG: &str = r#"
[application]
log_level = "debug"

[server]
base_url = "https://sub.jamfcloud.com"
username = "api_user"
password = "${JAMF_BATCH_IT_PASSWORD}"
timeout_seconds = 30
tls_verify = false

[batch]
concurrency = 8
backup_dir = "/var/backups/jss"
status_filter = "Pending+Failed"
dry_run = true

[logging]
local_enabled = true
local_path = "/var/log/jamf-batch"
local_rotation = "hourly"
"#;

#[test]
fn test_full_config_with_substitution() {
    let _guard = ENV_MUTEX.lock().unwrap();
    std::env::set_var("JAMF_BATCH_IT_PASSWORD", "s3cret");

    let file = write_config(FULL_CONFIG);
    let config = load_config(file.path()).unwrap();
    std::env::remove_var("JAMF_BATCH_IT_PASSWORD");

    assert!(config.validate().is_ok());
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.server.base_url, "https://sub.jamfcloud.com");
    assert_eq!(config.server.username.as_deref(), Some("api_user"));
    assert_eq!(
        config
            .server
            .password
            .as_ref()
            .unwrap()
            .expose_secret()
            .as_ref(),
        "s3cret"
    );
    assert_eq!(config.server.timeout_seconds, 30);
    assert!(!config.server.tls_verify);
    assert_eq!(config.batch.concurrency, 8);
    assert_eq!(config.batch.backup_dir, "/var/backups/jss");
    assert_eq!(config.batch.status_filter, StatusFilter::PendingAndFailed);
    assert!(config.batch.dry_run);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_missing_substitution_variable_is_reported() {
    let _guard = ENV_MUTEX.lock().unwrap();
    std::env::remove_var("JAMF_BATCH_IT_PASSWORD");

    let file = write_config(FULL_CONFIG);
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("JAMF_BATCH_IT_PASSWORD"));
}

#[test]
fn test_env_overrides_win_over_file() {
    let _guard = ENV_MUTEX.lock().unwrap();
    std::env::set_var("JAMF_BATCH_BATCH_CONCURRENCY", "2");
    std::env::set_var("JAMF_BATCH_BATCH_STATUS_FILTER", "Pending");
    std::env::set_var("JAMF_BATCH_SERVER_BASE_URL", "https://other.jamfcloud.com");

    let file = write_config(
        r#"
[server]
base_url = "https://sub.jamfcloud.com"

[batch]
concurrency = 12
"#,
    );
    let result = load_config(file.path());

    std::env::remove_var("JAMF_BATCH_BATCH_CONCURRENCY");
    std::env::remove_var("JAMF_BATCH_BATCH_STATUS_FILTER");
    std::env::remove_var("JAMF_BATCH_SERVER_BASE_URL");

    let config = result.unwrap();
    assert_eq!(config.batch.concurrency, 2);
    assert_eq!(config.batch.status_filter, StatusFilter::Pending);
    assert_eq!(config.server.base_url, "https://other.jamfcloud.com");
}

#[test]
fn test_minimal_config_uses_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let file = write_config(
        r#"
[server]
base_url = "https://sub.jamfcloud.com"
username = "api"
password = "secret"
"#,
    );
    let config = load_config(file.path()).unwrap();

    assert!(config.validate().is_ok());
    assert_eq!(config.batch.concurrency, 4);
    assert_eq!(config.batch.backup_dir, ".");
    assert_eq!(config.batch.status_filter, StatusFilter::Failed);
    assert_eq!(config.server.timeout_seconds, 60);
    assert!(config.server.tls_verify);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_validation_failures() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let cases = [
        ("ftp://sub.jamfcloud.com", 4, "http"),
        ("https://sub.jamfcloud.com", 0, "concurrency"),
        ("https://sub.jamfcloud.com", 17, "concurrency"),
    ];

    for (url, concurrency, expected) in cases {
        let file = write_config(&format!(
            r#"
[server]
base_url = "{url}"
username = "api"
password = "secret"

[batch]
concurrency = {concurrency}
"#
        ));
        let config = load_config(file.path()).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains(expected), "{err}");
    }
}

#[test]
fn test_unknown_status_filter_fails_to_parse() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let file = write_config(
        r#"
[batch]
status_filter = "Acknowledged"
"#,
    );
    assert!(load_config(file.path()).is_err());
}
