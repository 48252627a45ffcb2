//! [`PuppetDbConfigLoader`] reading `puppetdb.conf` from disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use puppetdb::{ConfigError, PuppetDbConfig, PuppetDbConfigLoader};

/// Location of `puppetdb.conf` on a standard Puppet agent install.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/puppetlabs/puppet/puppetdb.conf";

/// Loads [`PuppetDbConfig`] from a file.
///
/// A missing file is [`ConfigError::Unavailable`]; any other read failure is
/// [`ConfigError::Io`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfigLoader {
    path: PathBuf,
}

impl FileConfigLoader {
    /// Creates a loader for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file this loader reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigLoader {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl PuppetDbConfigLoader for FileConfigLoader {
    fn load(&self) -> Result<PuppetDbConfig, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(ConfigError::Unavailable),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        tracing::debug!(path = %self.path.display(), "Loaded PuppetDB configuration");
        PuppetDbConfig::parse(&text)
    }
}
