//! Error types for query execution and the compatibility probe.
//!
//! [`QueryError`] is what [`crate::QueryConnection::query`] returns. None of
//! its variants are retried or recovered inside this crate; every failure is
//! surfaced to the caller as-is.
//!
//! [`ConfigError`] is produced by [`crate::PuppetDbConfigLoader`]
//! implementations. [`crate::check_version`] suppresses only
//! [`ConfigError::Unavailable`].

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

/// Errors raised while executing a single PuppetDB query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The service answered with a non-success status.
    ///
    /// `query` is the serialised expression that was sent (after any extract
    /// transform), or `null` for unfiltered queries.
    #[error("PuppetDB query error: [{status}] {message}, query: {query}")]
    Execution {
        /// Numeric HTTP status code.
        status: u16,
        /// Status message reported by the transport (e.g. `"Internal Error"`).
        message: String,
        /// Serialised query that produced the failure.
        query: String,
    },

    /// A success response carried a body that is not valid JSON.
    #[error("PuppetDB response could not be decoded as JSON: {source}")]
    Decode {
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The transport capability failed before a response was received
    /// (connection refused, TLS handshake failure, client construction).
    #[error("PuppetDB transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },
}

impl QueryError {
    /// Builds a [`QueryError::Transport`] from any displayable cause.
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        QueryError::Transport {
            message: cause.to_string(),
        }
    }

    /// Returns the HTTP status for [`QueryError::Execution`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            QueryError::Execution { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(source: serde_json::Error) -> Self {
        QueryError::Decode { source }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors raised while loading the PuppetDB client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration source exists (e.g. `puppetdb.conf` is absent).
    ///
    /// This is the only condition the compatibility probe treats as "nothing
    /// to check".
    #[error("PuppetDB configuration is not available")]
    Unavailable,

    /// The configuration source exists but could not be read.
    #[error("failed to read PuppetDB configuration '{}': {source}", path.display())]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration was read but is malformed.
    #[error("invalid PuppetDB configuration at line {line}: {message}")]
    Parse {
        /// One-based line number of the offending entry.
        line: usize,
        /// Description of the problem.
        message: String,
    },
}
