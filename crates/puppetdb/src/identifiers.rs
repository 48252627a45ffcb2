//! Newtype names substituted into the query path.
//!
//! Endpoints and API versions are both plain text on the wire, but mixing them
//! up silently produces a path such as `/pdb/query/nodes/v4`. Wrapping each in
//! its own type keeps the two positions of the path apart.
//!
//! Neither type validates its content: the remote service owns the set of
//! valid endpoints and versions, so an unknown name surfaces as a
//! [`crate::QueryError::Execution`] from the server rather than a local error.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped path segments.
// Generates: struct, new(), as_str(), Display, From<&str>, From<String>.
// ---------------------------------------------------------------------------
macro_rules! path_segment {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps `value` verbatim.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the segment as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

path_segment! {
    /// Names the remote collection being queried (`nodes`, `facts`,
    /// `resources`, ...).
    ///
    /// Substituted as the last segment of `/pdb/query/<version>/<endpoint>`.
    Endpoint
}

path_segment! {
    /// Query API version tag, the `<version>` segment of the query path.
    ///
    /// Defaults to [`QueryVersion::V4`].
    QueryVersion
}

impl Endpoint {
    /// The `nodes` endpoint.
    pub fn nodes() -> Self {
        Self::new("nodes")
    }

    /// The `facts` endpoint.
    pub fn facts() -> Self {
        Self::new("facts")
    }

    /// The `resources` endpoint.
    pub fn resources() -> Self {
        Self::new("resources")
    }
}

impl QueryVersion {
    /// The version tag used when the caller does not name one.
    pub const V4: &'static str = "v4";
}

impl Default for QueryVersion {
    fn default() -> Self {
        Self::new(Self::V4)
    }
}
