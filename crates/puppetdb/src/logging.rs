//! [`QueryLogger`] backed by `tracing`.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::QueryLogger;

/// Forwards query diagnostics to `tracing` events.
///
/// Deprecation notices are emitted once per distinct message for the lifetime
/// of the logger, so a legacy call site inside a loop warns only once.
#[derive(Debug, Default)]
pub struct TracingQueryLogger {
    seen_deprecations: Mutex<HashSet<String>>,
}

impl TracingQueryLogger {
    /// Creates a logger with no deprecations recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time `message` is offered.
    fn first_deprecation(&self, message: &str) -> bool {
        match self.seen_deprecations.lock() {
            Ok(mut seen) => seen.insert(message.to_string()),
            // A poisoned set only costs a repeated warning.
            Err(_) => true,
        }
    }
}

impl QueryLogger for TracingQueryLogger {
    fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    fn deprecation_warning(&self, message: &str) {
        if self.first_deprecation(message) {
            tracing::warn!(deprecation = true, "{}", message);
        }
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}
