//! Construction of the outbound request target.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::form_urlencoded;

use crate::{ConnectionTarget, Endpoint, QueryExpression, QuerySource, QueryVersion};

/// Path prefix shared by every query endpoint.
const QUERY_PATH_PREFIX: &str = "/pdb/query";

/// Bytes a face-sourced query cannot carry literally: characters illegal in a
/// URI query, plus `%`, `&` and `+`, which the server would otherwise decode.
/// JSON punctuation such as `[ ] , = :` stays raw.
const RAW_QUERY: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// A fully built `GET` target for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    uri: String,
    serialized_query: String,
}

impl QueryRequest {
    /// Builds `<scheme>://<host>:<port>/pdb/query/<version>/<endpoint>`,
    /// appending `?query=...` when `query` is present and non-empty.
    ///
    /// [`QuerySource::Face`] appends the JSON nearly verbatim, escaping only
    /// quote marks, spaces and the few bytes that would end or corrupt the
    /// query component. [`QuerySource::Function`] form-encodes all of it. The two are not interchangeable: some callers depend on the
    /// raw form reaching the server with its punctuation intact.
    pub fn build(
        target: &ConnectionTarget,
        endpoint: &Endpoint,
        version: &QueryVersion,
        query: Option<&QueryExpression>,
        source: QuerySource,
    ) -> Self {
        let mut uri = format!(
            "{}{}/{}/{}",
            target.base_url(),
            QUERY_PATH_PREFIX,
            version,
            endpoint
        );

        let serialized_query = query.map_or_else(|| "null".to_string(), QueryExpression::to_json);

        if query.is_some_and(|q| !q.is_empty()) {
            uri.push_str("?query=");
            match source {
                QuerySource::Face => {
                    uri.extend(utf8_percent_encode(&serialized_query, RAW_QUERY))
                }
                QuerySource::Function => {
                    uri.extend(form_urlencoded::byte_serialize(serialized_query.as_bytes()))
                }
            }
        }

        Self {
            uri,
            serialized_query,
        }
    }

    /// Returns the request URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the query as compact JSON (`null` when no query was given).
    pub fn serialized_query(&self) -> &str {
        &self.serialized_query
    }
}
