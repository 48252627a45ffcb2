//! Port traits implemented by infrastructure crates.
//!
//! [`crate::QueryConnection`] sees only these traits. The `transport` crate
//! supplies reqwest-backed implementations; tests supply stubs.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{ConnectionTarget, QueryError};

// ---------------------------------------------------------------------------
// HTTP transport
// ---------------------------------------------------------------------------

/// A response as reported by an [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code.
    pub status: u16,
    /// Status message, e.g. `"Internal Server Error"`.
    ///
    /// Adapters may substitute the standard reason phrase for the status code
    /// (the `reqwest` adapter does), so this is not necessarily the text the
    /// server sent.
    pub message: String,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response from its parts.
    pub fn new(status: u16, message: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability that issues HTTP GET requests.
///
/// Implementations own timeouts, TLS, and connection reuse; the caller never
/// retries. Must be safe to share across concurrent queries.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issues `GET uri` with the given headers.
    ///
    /// A non-success status is still `Ok`; only failures to obtain a response
    /// at all are reported as [`QueryError::Transport`].
    async fn get(&self, uri: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, QueryError>;
}

/// Session factory consulted when no [`HttpClient`] is injected into a query.
pub trait TransportFactory: Send + Sync {
    /// Returns a client able to reach `target`.
    fn transport(&self, target: &ConnectionTarget) -> Result<Arc<dyn HttpClient>, QueryError>;
}

// ---------------------------------------------------------------------------
// Logging sink
// ---------------------------------------------------------------------------

/// Diagnostic sink for query execution.
///
/// Both methods are infallible; a sink that cannot write must drop the
/// message rather than affect the query.
pub trait QueryLogger: Send + Sync {
    /// Records a debug-level diagnostic.
    fn debug(&self, message: &str);

    /// Records use of a deprecated calling convention.
    fn deprecation_warning(&self, message: &str);

    /// Records a general warning (used by the compatibility probe).
    fn warning(&self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_covers_the_2xx_range_only() {
        assert!(HttpResponse::new(200, "OK", "").is_success());
        assert!(HttpResponse::new(204, "No Content", "").is_success());
        assert!(!HttpResponse::new(199, "", "").is_success());
        assert!(!HttpResponse::new(302, "Found", "").is_success());
        assert!(!HttpResponse::new(500, "Internal Error", "").is_success());
    }
}
