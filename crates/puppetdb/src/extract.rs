//! The `extract` projection transform.
//!
//! PuppetDB's query language projects result fields with the `extract`
//! operator:
//!
//! ```text
//! ["extract", ["certname", "deactivated"], ["=", "certname", "x"]]
//! ["extract", ["certname"]]
//! ```
//!
//! The second form has no filter clause and projects over the whole endpoint.

use serde_json::Value;

use crate::{ExtractSpec, QueryExpression};

/// Operator keyword of the extract clause.
const EXTRACT_OPERATOR: &str = "extract";

/// Wraps `query` in an `extract` clause projecting `fields`.
///
/// When `query` is absent or empty, only the projection is emitted. Pure; the
/// same inputs always yield the same expression.
pub fn extract(fields: &ExtractSpec, query: Option<&QueryExpression>) -> QueryExpression {
    let projection = Value::Array(
        fields
            .fields()
            .iter()
            .map(|f| Value::String(f.clone()))
            .collect(),
    );

    let mut clause = vec![Value::String(EXTRACT_OPERATOR.to_string()), projection];
    if let Some(filter) = query.filter(|q| !q.is_empty()) {
        clause.push(filter.as_value().clone());
    }
    QueryExpression::new(Value::Array(clause))
}
