//! Error types for schedule sources.

use std::fmt;

/// Errors from schedule source operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The backing store could not be reached.
    Unavailable { reason: String },
    /// The query could not be evaluated.
    QueryFailed { reason: String },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => {
                write!(f, "schedule source unavailable: {reason}")
            }
            Self::QueryFailed { reason } => {
                write!(f, "schedule query failed: {reason}")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}
