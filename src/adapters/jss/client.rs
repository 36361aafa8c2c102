//! reqwest-backed JSS client
//!
//! Sends every request with HTTP basic authentication and JSON
//! `Content-Type`/`Accept` headers. Credentials are fixed for the lifetime of
//! the client.

use super::transport::{HttpReply, JssTransport};
use crate::config::ServerConfig;
use crate::domain::{BatchError, JssError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method};
use secrecy::ExposeSecret;
use std::time::Duration;

/// HTTP client for the Jamf Pro Classic API
///
/// # Example
///
/// ```no_run
/// use jamf_batch::adapters::jss::{JssClient, JssTransport};
/// use jamf_batch::config::{secret_string, ServerConfig};
///
/// # async fn example() -> jamf_batch::domain::Result<()> {
/// let config = ServerConfig {
///     base_url: "https://sub.jamfcloud.com".to_string(),
///     username: Some("api".to_string()),
///     password: Some(secret_string("secret".to_string())),
///     ..Default::default()
/// };
/// let client = JssClient::new(&config)?;
/// let reply = client.get("/JSSResource/mobiledeviceapplications").await?;
/// println!("status {}", reply.status);
/// # Ok(())
/// # }
/// ```
pub struct JssClient {
    base_url: String,
    client: Client,
}

impl JssClient {
    /// Build a client from the server configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when credentials are missing or the
    /// underlying HTTP client cannot be built.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .default_headers(default_headers(config)?);

        if !config.tls_verify {
            tracing::warn!(base_url = %base_url, "TLS certificate verification disabled");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            BatchError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        tracing::debug!(base_url = %base_url, "JSS client created");

        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> Result<String> {
        if !path.starts_with('/') {
            return Err(JssError::InvalidUrl(format!("path must start with '/': {path}")).into());
        }
        Ok(format!("{}{}", self.base_url, path))
    }

    async fn send(&self, method: Method, path: &str) -> Result<HttpReply> {
        let url = self.url(path)?;

        tracing::trace!(method = %method, url = %url, "Sending request");

        let resp = self
            .client
            .request(method.clone(), &url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    JssError::Timeout(format!("{method} {url}"))
                } else {
                    JssError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| JssError::InvalidResponse(e.to_string()))?;

        tracing::debug!(method = %method, url = %url, status, "Received response");

        Ok(HttpReply { status, body })
    }
}

/// Basic auth and JSON headers sent with every request
fn default_headers(config: &ServerConfig) -> Result<HeaderMap> {
    let (Some(username), Some(password)) = (&config.username, &config.password) else {
        return Err(BatchError::Configuration(
            "server.username and server.password are required".to_string(),
        ));
    };

    let credentials = format!("{}:{}", username, password.expose_secret().as_ref());
    let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
    let mut auth = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|e| BatchError::Configuration(format!("Invalid credentials: {e}")))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

#[async_trait]
impl JssTransport for JssClient {
    async fn get(&self, path: &str) -> Result<HttpReply> {
        self.send(Method::GET, path).await
    }

    async fn delete(&self, path: &str) -> Result<HttpReply> {
        self.send(Method::DELETE, path).await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn config() -> ServerConfig {
        ServerConfig {
            base_url: "https://sub.jamfcloud.com/".to_string(),
            username: Some("api".to_string()),
            password: Some(secret_string("secret".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = JssClient::new(&config()).unwrap();
        assert_eq!(client.base_url(), "https://sub.jamfcloud.com");
        assert_eq!(
            client.url("/JSSResource/mobiledevices").unwrap(),
            "https://sub.jamfcloud.com/JSSResource/mobiledevices"
        );
    }

    #[test]
    fn test_client_rejects_relative_path() {
        let client = JssClient::new(&config()).unwrap();
        assert!(client.url("JSSResource").is_err());
    }

    #[test]
    fn test_client_requires_credentials() {
        let mut cfg = config();
        cfg.password = None;
        assert!(matches!(
            JssClient::new(&cfg),
            Err(BatchError::Configuration(_))
        ));
    }

    #[test]
    fn test_default_headers_basic_auth() {
        let headers = default_headers(&config()).unwrap();
        // base64("api:secret")
        assert_eq!(headers[AUTHORIZATION], "Basic YXBpOnNlY3JldA==");
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }
}
