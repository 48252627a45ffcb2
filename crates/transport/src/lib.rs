//! PuppetDB transport infrastructure adapter.
//!
//! Implements the [`puppetdb::HttpClient`] and [`puppetdb::TransportFactory`]
//! ports over `reqwest`, and the [`puppetdb::PuppetDbConfigLoader`] port over
//! a `puppetdb.conf` file on disk.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** TLS material, timeouts, connection pooling, and file
//! access all live here. The [`puppetdb`] crate sees only its port traits.
//!
//! ## Connection Reuse
//!
//! [`ReqwestTransportFactory`] builds one `reqwest::Client` up front. Every
//! [`ReqwestHttpClient`] it hands out shares that client's connection pool, so
//! obtaining a transport per query is cheap.

pub mod client;
pub mod config_file;
pub mod errors;
pub mod settings;

pub use client::{ReqwestHttpClient, ReqwestTransportFactory};
pub use config_file::{FileConfigLoader, DEFAULT_CONFIG_PATH};
pub use errors::TransportError;
pub use settings::HttpSettings;
