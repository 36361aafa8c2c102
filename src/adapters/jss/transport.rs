//! JSS transport trait
//!
//! The pipeline only needs to issue `GET` and `DELETE` requests against the
//! server and inspect the status code and body. Keeping that behind a trait
//! lets tests substitute a scripted transport that records call order.

use crate::domain::Result;
use async_trait::async_trait;

/// Status code and body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Short body excerpt for error messages
    pub fn excerpt(&self) -> &str {
        let end = self
            .body
            .char_indices()
            .nth(200)
            .map(|(i, _)| i)
            .unwrap_or(self.body.len());
        self.body[..end].trim()
    }
}

/// Authenticated access to the JSS
///
/// Paths are relative to the server base URL and start with `/JSSResource`.
/// Implementations return `Err` only when no HTTP status was obtained
/// (connection refused, timeout); non-success statuses are returned as replies.
#[async_trait]
pub trait JssTransport: Send + Sync {
    /// Issue a GET request
    async fn get(&self, path: &str) -> Result<HttpReply>;

    /// Issue a DELETE request
    async fn delete(&self, path: &str) -> Result<HttpReply>;

    /// Base URL requests are issued against
    fn base_url(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_classification() {
        assert!(HttpReply::new(200, "").is_success());
        assert!(HttpReply::new(204, "").is_success());
        assert!(!HttpReply::new(404, "").is_success());
        assert!(HttpReply::new(404, "").is_not_found());
        assert!(!HttpReply::new(500, "").is_not_found());
    }

    #[test]
    fn test_reply_excerpt_truncates() {
        let reply = HttpReply::new(500, "x".repeat(500));
        assert_eq!(reply.excerpt().len(), 200);
        assert_eq!(HttpReply::new(500, "  oops \n").excerpt(), "oops");
    }
}
