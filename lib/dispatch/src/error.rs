//! Error types for the dispatch crate.
//!
//! Errors are designed for layered context using rootcause: the context
//! engine itself is total, so the only failure here is the schedule
//! source refusing a query.

use std::fmt;

/// Errors from dispatching a function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The schedule source failed to evaluate the query.
    ScheduleFetch { operation: String, reason: String },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScheduleFetch { operation, reason } => {
                write!(f, "schedule fetch failed for {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for DispatchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_error_display() {
        let err = DispatchError::ScheduleFetch {
            operation: "search_by_topic".to_string(),
            reason: "unavailable".to_string(),
        };
        assert!(err.to_string().contains("search_by_topic"));
        assert!(err.to_string().contains("unavailable"));
    }
}
