//! Transport configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Settings applied to every request made through a
/// [`crate::ReqwestTransportFactory`].
///
/// The default has no timeout and trusts only the built-in web PKI roots. A
/// PuppetDB behind Puppet's own CA needs `ca_cert`; one that requires client
/// certificates also needs `identity`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpSettings {
    /// Total time allowed for one request, connection included.
    pub timeout: Option<Duration>,
    /// PEM bundle of additional trusted CA certificates.
    pub ca_cert: Option<PathBuf>,
    /// PEM file holding a client certificate followed by its private key.
    pub identity: Option<PathBuf>,
}

impl HttpSettings {
    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the CA bundle path.
    pub fn with_ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert = Some(path.into());
        self
    }

    /// Sets the client identity path.
    pub fn with_identity(mut self, path: impl Into<PathBuf>) -> Self {
        self.identity = Some(path.into());
        self
    }
}
