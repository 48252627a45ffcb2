//! Per-call query options and the legacy calling convention.

use std::sync::Arc;

use crate::{ExtractSpec, HttpClient, QueryLogger, QuerySource};

/// Notice emitted when a bare [`HttpClient`] is passed in place of options.
pub const LEGACY_HTTP_DEPRECATION: &str =
    "Passing an HTTP client in place of query options is deprecated; use QueryOptions::with_http instead";

/// Options recognised by [`crate::QueryConnection::query`].
///
/// Every field is optional. Fields set by the caller override
/// [`QueryOptions::defaults`]; unset fields keep the default.
#[derive(Clone, Default)]
pub struct QueryOptions {
    /// Pre-built transport. `None` means "obtain one from the connection's
    /// transport factory".
    pub http: Option<Arc<dyn HttpClient>>,
    /// Fields to project with an `extract` clause. `None` or an empty spec
    /// leaves the query untouched.
    pub extract: Option<ExtractSpec>,
    /// Encoding of the `query` parameter.
    pub source: Option<QuerySource>,
}

impl QueryOptions {
    /// The baseline every call is merged over: no injected transport, no
    /// extract, [`QuerySource::Face`].
    pub fn defaults() -> Self {
        Self {
            http: None,
            extract: None,
            source: Some(QuerySource::Face),
        }
    }

    /// Sets the transport to use for this call.
    pub fn with_http(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the fields to extract.
    pub fn with_extract(mut self, fields: ExtractSpec) -> Self {
        self.extract = Some(fields);
        self
    }

    /// Sets the request source.
    pub fn with_source(mut self, source: QuerySource) -> Self {
        self.source = Some(source);
        self
    }

    /// Returns `self` with every field that is set in `overrides` replaced.
    pub fn merge(self, overrides: QueryOptions) -> Self {
        Self {
            http: overrides.http.or(self.http),
            extract: overrides.extract.or(self.extract),
            source: overrides.source.or(self.source),
        }
    }

    /// Returns the effective source, falling back to [`QuerySource::Face`].
    pub fn source(&self) -> QuerySource {
        self.source.unwrap_or_default()
    }

    /// Returns the extract spec if it requests at least one field.
    pub fn active_extract(&self) -> Option<&ExtractSpec> {
        self.extract.as_ref().filter(|fields| !fields.is_empty())
    }
}

impl std::fmt::Debug for QueryOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryOptions")
            .field("http", &self.http.as_ref().map(|_| "<HttpClient>"))
            .field("extract", &self.extract)
            .field("source", &self.source)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Calling conventions
// ---------------------------------------------------------------------------

/// What a caller may pass in the options position of a query.
///
/// Older callers passed the transport itself where options now go. That shape
/// is still accepted as [`QueryOptionsArg::LegacyHttp`] and normalised to
/// `QueryOptions { http: Some(..), .. }` with a deprecation notice.
#[derive(Clone)]
pub enum QueryOptionsArg {
    /// The current convention.
    Options(QueryOptions),
    /// Deprecated: a bare transport in the options position.
    LegacyHttp(Arc<dyn HttpClient>),
}

impl QueryOptionsArg {
    /// Merges the argument over [`QueryOptions::defaults`], reporting the
    /// legacy shape to `logger`.
    pub fn resolve(self, logger: &dyn QueryLogger) -> QueryOptions {
        match self {
            QueryOptionsArg::Options(options) => QueryOptions::defaults().merge(options),
            QueryOptionsArg::LegacyHttp(http) => {
                logger.deprecation_warning(LEGACY_HTTP_DEPRECATION);
                QueryOptions::defaults().merge(QueryOptions::default().with_http(http))
            }
        }
    }
}

impl Default for QueryOptionsArg {
    fn default() -> Self {
        QueryOptionsArg::Options(QueryOptions::default())
    }
}

impl From<QueryOptions> for QueryOptionsArg {
    fn from(options: QueryOptions) -> Self {
        QueryOptionsArg::Options(options)
    }
}

impl From<Option<QueryOptions>> for QueryOptionsArg {
    fn from(options: Option<QueryOptions>) -> Self {
        QueryOptionsArg::Options(options.unwrap_or_default())
    }
}

impl From<Arc<dyn HttpClient>> for QueryOptionsArg {
    fn from(http: Arc<dyn HttpClient>) -> Self {
        QueryOptionsArg::LegacyHttp(http)
    }
}
