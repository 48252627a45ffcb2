//! Client-side connector for the PuppetDB query API.
//!
//! Turns an endpoint name, an optional query expression in PuppetDB's
//! array-based query language, and a set of options into a single
//! `GET /pdb/query/<version>/<endpoint>` request, and decodes the JSON reply.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate performs no network or
//! file I/O itself. The transport ([`HttpClient`], [`TransportFactory`]), the
//! logging sink ([`QueryLogger`]), and the configuration source
//! ([`PuppetDbConfigLoader`]) are traits; the `transport` crate supplies the
//! production implementations.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Path segment newtypes (`Endpoint`, `QueryVersion`) |
//! | [`types`] | Value types (`QueryExpression`, `ExtractSpec`, `QuerySource`, `ConnectionTarget`) |
//! | [`errors`] | `QueryError` and `ConfigError` |
//! | [`ports`] | `HttpClient`, `TransportFactory`, `QueryLogger` |
//! | [`options`] | Per-call `QueryOptions` and the legacy calling convention |
//! | [`extract`] | The `extract` projection transform |
//! | [`request`] | Request URI construction |
//! | [`connection`] | `QueryConnection` |
//! | [`config`] | `puppetdb.conf` parsing and `check_version` |
//! | [`logging`] | `tracing`-backed `QueryLogger` |

pub mod config;
pub mod connection;
pub mod errors;
pub mod extract;
pub mod identifiers;
pub mod logging;
pub mod options;
pub mod ports;
pub mod request;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{
    check_version, PuppetDbConfig, PuppetDbConfigLoader, UNSUPPORTED_VERSION_WARNING,
};
pub use connection::QueryConnection;
pub use errors::{ConfigError, QueryError};
pub use extract::extract;
pub use identifiers::{Endpoint, QueryVersion};
pub use logging::TracingQueryLogger;
pub use options::{QueryOptions, QueryOptionsArg, LEGACY_HTTP_DEPRECATION};
pub use ports::{HttpClient, HttpResponse, QueryLogger, TransportFactory};
pub use request::QueryRequest;
pub use types::{ConnectionTarget, ExtractSpec, QueryExpression, QuerySource, UnknownQuerySource};
