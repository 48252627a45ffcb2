//! Shared value types for PuppetDB queries.
//!
//! Unlike the path segments in [`crate::identifiers`], these types carry
//! structure: a query expression is a JSON term tree, an extract spec is an
//! ordered field list, and a connection target fixes the scheme, host, and port
//! of the remote service.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Query expressions
// ---------------------------------------------------------------------------

/// A query in PuppetDB's array-based query language, e.g.
/// `["=", "certname", "foo"]`.
///
/// The expression is opaque to this crate: it is never validated, only
/// serialised to compact JSON when a request is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryExpression(Value);

impl QueryExpression {
    /// Wraps a JSON value as a query expression.
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// Returns the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the expression and returns the underlying JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Returns `true` for `null` and for empty arrays, strings, and objects.
    ///
    /// An empty expression never produces a `query` parameter.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            Value::String(s) => s.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    /// Serialises the expression to compact JSON.
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }
}

impl From<Value> for QueryExpression {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl FromStr for QueryExpression {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map(Self)
    }
}

impl std::fmt::Display for QueryExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// Ordered list of field names projected by an `extract` clause.
///
/// May be empty; an empty spec disables the extract transform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractSpec(Vec<String>);

impl ExtractSpec {
    /// Creates a spec from the given field names, preserving order.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    /// Returns the field names in order.
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` if no fields are requested.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExtractSpec {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// ---------------------------------------------------------------------------
// Request provenance
// ---------------------------------------------------------------------------

/// Which caller built the request, selecting how the `query` parameter is
/// encoded.
///
/// - [`QuerySource::Face`]: `query=<json>` is appended raw, unescaped.
/// - [`QuerySource::Function`]: the JSON is form-encoded
///   (`application/x-www-form-urlencoded` rules) before being appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuerySource {
    /// Command-line face; raw query string.
    #[default]
    Face,
    /// Catalog function; form-encoded query string.
    Function,
}

impl QuerySource {
    /// Returns the lowercase tag (`"face"` or `"function"`).
    pub fn as_str(self) -> &'static str {
        match self {
            QuerySource::Face => "face",
            QuerySource::Function => "function",
        }
    }
}

impl std::fmt::Display for QuerySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a [`QuerySource`] from an unrecognised tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown query source '{0}' (expected 'face' or 'function')")]
pub struct UnknownQuerySource(pub String);

impl FromStr for QuerySource {
    type Err = UnknownQuerySource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "face" => Ok(QuerySource::Face),
            "function" => Ok(QuerySource::Function),
            other => Err(UnknownQuerySource(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Connection target
// ---------------------------------------------------------------------------

/// Host, port, and scheme of the PuppetDB service.
///
/// Fixed at construction; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionTarget {
    host: String,
    port: u16,
    use_ssl: bool,
}

impl ConnectionTarget {
    /// Host used when none is configured.
    pub const DEFAULT_HOST: &'static str = "puppetdb";
    /// Port used when none is configured.
    pub const DEFAULT_PORT: u16 = 443;

    /// Creates a target for `host:port`, using HTTPS when `use_ssl` is set.
    pub fn new(host: impl Into<String>, port: u16, use_ssl: bool) -> Self {
        Self {
            host: host.into(),
            port,
            use_ssl,
        }
    }

    /// Returns the host name.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the TCP port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns `true` if requests use HTTPS.
    pub fn use_ssl(&self) -> bool {
        self.use_ssl
    }

    /// Returns `"https"` or `"http"`.
    pub fn scheme(&self) -> &'static str {
        if self.use_ssl {
            "https"
        } else {
            "http"
        }
    }

    /// Returns `<scheme>://<host>:<port>` with no trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port)
    }
}

impl Default for ConnectionTarget {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HOST, Self::DEFAULT_PORT, true)
    }
}

impl std::fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base_url())
    }
}
