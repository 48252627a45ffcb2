//! `reqwest`-backed transport.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use puppetdb::{ConnectionTarget, HttpClient, HttpResponse, QueryError, TransportFactory};
use reqwest::{Certificate, Client, Identity};

use crate::{HttpSettings, TransportError};

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// [`HttpClient`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Wraps an existing `reqwest` client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, uri: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, QueryError> {
        let mut request = self.client.get(uri);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(QueryError::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(QueryError::transport)?;

        tracing::trace!(status = status.as_u16(), bytes = body.len(), "PuppetDB response received");

        Ok(HttpResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            body,
        ))
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// [`TransportFactory`] handing out clients that share one connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransportFactory {
    client: Client,
}

impl ReqwestTransportFactory {
    /// Builds the shared client from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if a PEM file cannot be read or parsed, or if
    /// the TLS backend rejects the configuration.
    pub fn new(settings: &HttpSettings) -> Result<Self, TransportError> {
        let mut builder = Client::builder().use_rustls_tls();

        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(path) = &settings.ca_cert {
            let pem = read_pem(path)?;
            let certs = Certificate::from_pem_bundle(&pem).map_err(|source| {
                TransportError::InvalidPem {
                    path: path.clone(),
                    source,
                }
            })?;
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }
        if let Some(path) = &settings.identity {
            let pem = read_pem(path)?;
            let identity =
                Identity::from_pem(&pem).map_err(|source| TransportError::InvalidPem {
                    path: path.clone(),
                    source,
                })?;
            builder = builder.identity(identity);
        }

        let client = builder.build().map_err(TransportError::Build)?;
        Ok(Self { client })
    }
}

impl TransportFactory for ReqwestTransportFactory {
    fn transport(&self, target: &ConnectionTarget) -> Result<Arc<dyn HttpClient>, QueryError> {
        tracing::debug!(service = %target, "Using pooled PuppetDB transport");
        Ok(Arc::new(ReqwestHttpClient::new(self.client.clone())))
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, TransportError> {
    std::fs::read(path).map_err(|source| TransportError::ReadPem {
        path: path.to_path_buf(),
        source,
    })
}
