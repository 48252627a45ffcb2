//! Errors raised while building the HTTP transport.
//!
//! Failures during a request are reported through
//! [`puppetdb::QueryError::Transport`] instead; these cover setup only.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while constructing a [`crate::ReqwestTransportFactory`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// A PEM file named in [`crate::HttpSettings`] could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    ReadPem {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A PEM file was read but does not hold a usable certificate or identity.
    #[error("invalid TLS material in '{}': {source}", path.display())]
    InvalidPem {
        /// File holding the rejected material.
        path: PathBuf,
        /// Error reported by `reqwest`.
        #[source]
        source: reqwest::Error,
    },

    /// The `reqwest` client could not be built from the settings.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}
