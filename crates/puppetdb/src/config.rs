//! Client configuration and the PuppetDB version compatibility probe.
//!
//! Puppet agents describe their PuppetDB service in `puppetdb.conf`:
//!
//! ```text
//! [main]
//! server_urls = https://puppetdb.example.com:8081,https://replica.example.com:8081
//! ```
//!
//! PuppetDB 3.0 introduced `server_urls`. Configurations written for 2.x carry
//! `server` and `port` instead, which [`check_version`] reports as unsupported.

use url::Url;

use crate::{ConfigError, ConnectionTarget, QueryLogger};

/// Warning emitted when the configuration predates PuppetDB 3.0.
pub const UNSUPPORTED_VERSION_WARNING: &str = "It looks like you are using a PuppetDB version < 3.0. \
This client requires at least PuppetDB 3.0 to work. \
To keep using PuppetDB 2.x, stay on the 1.x release line of this client.";

/// Settings read from the `[main]` section of `puppetdb.conf`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuppetDbConfig {
    server_urls: Option<Vec<ConnectionTarget>>,
    server: Option<String>,
    port: Option<u16>,
}

impl PuppetDbConfig {
    /// Parses `puppetdb.conf` content.
    ///
    /// Keys outside `[main]` and unknown keys are ignored. Blank lines and
    /// lines starting with `#` or `;` are comments.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let mut in_main = false;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(section) = line.strip_prefix('[') {
                let name = section.strip_suffix(']').ok_or_else(|| ConfigError::Parse {
                    line: line_no,
                    message: format!("unterminated section header '{line}'"),
                })?;
                in_main = name.trim() == "main";
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::Parse {
                line: line_no,
                message: format!("expected 'key = value', found '{line}'"),
            })?;
            if !in_main {
                continue;
            }

            let value = value.trim();
            match key.trim() {
                "server_urls" => {
                    let targets = value
                        .split(',')
                        .map(str::trim)
                        .filter(|url| !url.is_empty())
                        .map(|url| parse_server_url(url, line_no))
                        .collect::<Result<Vec<_>, _>>()?;
                    config.server_urls = Some(targets);
                }
                "server" => config.server = Some(value.to_string()),
                "port" => {
                    let port = value.parse().map_err(|_| ConfigError::Parse {
                        line: line_no,
                        message: format!("invalid port '{value}'"),
                    })?;
                    config.port = Some(port);
                }
                _ => {}
            }
        }

        Ok(config)
    }

    /// Returns `true` when the configuration uses the PuppetDB 3.0+ shape.
    pub fn has_server_urls(&self) -> bool {
        self.server_urls.is_some()
    }

    /// Returns the configured servers in order, if `server_urls` was set.
    pub fn server_urls(&self) -> Option<&[ConnectionTarget]> {
        self.server_urls.as_deref()
    }

    /// Returns the first usable service: the first `server_urls` entry, or
    /// the legacy `server`/`port` pair over HTTPS.
    pub fn primary_target(&self) -> Option<ConnectionTarget> {
        if let Some(first) = self.server_urls.as_ref().and_then(|urls| urls.first()) {
            return Some(first.clone());
        }
        self.server.as_ref().map(|host| {
            ConnectionTarget::new(
                host.clone(),
                self.port.unwrap_or(ConnectionTarget::DEFAULT_PORT),
                true,
            )
        })
    }
}

fn parse_server_url(raw: &str, line: usize) -> Result<ConnectionTarget, ConfigError> {
    let invalid = |message: String| ConfigError::Parse { line, message };

    let url = Url::parse(raw).map_err(|e| invalid(format!("invalid server URL '{raw}': {e}")))?;
    let use_ssl = match url.scheme() {
        "https" => true,
        "http" => false,
        other => return Err(invalid(format!("unsupported scheme '{other}' in '{raw}'"))),
    };
    let host = url
        .host_str()
        .ok_or_else(|| invalid(format!("server URL '{raw}' has no host")))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| invalid(format!("server URL '{raw}' has no port")))?;

    Ok(ConnectionTarget::new(host, port, use_ssl))
}

// ---------------------------------------------------------------------------
// Compatibility probe
// ---------------------------------------------------------------------------

/// Optional source of [`PuppetDbConfig`].
pub trait PuppetDbConfigLoader: Send + Sync {
    /// Loads the configuration.
    ///
    /// Returns [`ConfigError::Unavailable`] when no configuration exists.
    fn load(&self) -> Result<PuppetDbConfig, ConfigError>;
}

/// Replays a configuration that was already read; `None` is unavailable.
impl PuppetDbConfigLoader for Option<PuppetDbConfig> {
    fn load(&self) -> Result<PuppetDbConfig, ConfigError> {
        self.clone().ok_or(ConfigError::Unavailable)
    }
}

/// Warns through `logger` when the configured PuppetDB predates 3.0.
///
/// An unavailable configuration is a silent no-op. Any other load failure is
/// returned.
pub fn check_version(
    loader: &dyn PuppetDbConfigLoader,
    logger: &dyn QueryLogger,
) -> Result<(), ConfigError> {
    let config = match loader.load() {
        Ok(config) => config,
        Err(ConfigError::Unavailable) => return Ok(()),
        Err(e) => return Err(e),
    };

    if !config.has_server_urls() {
        logger.warning(UNSUPPORTED_VERSION_WARNING);
    }
    Ok(())
}
