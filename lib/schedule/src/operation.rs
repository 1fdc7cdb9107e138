//! Named query operations exposed to the voice AI function-call layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A schedule query operation.
///
/// These are the function names the voice AI (or the text harness) may
/// request. The set is closed: unknown names are rejected at the parse
/// boundary, not deep in the dispatch path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Sessions running right now.
    GetCurrentSessions,
    /// Sessions starting later today.
    GetUpcomingSessions,
    /// Search sessions by topic keyword.
    SearchByTopic,
    /// Search sessions by speaker name.
    SearchBySpeaker,
    /// Detail lookup for a single session.
    GetSessionDetails,
    /// Search sessions by type (talk, workshop, keynote, ...).
    SearchByType,
    /// The entire schedule.
    GetFullSchedule,
    /// Free-text search across titles and speakers.
    SearchGeneral,
}

impl Operation {
    /// Returns the wire name of this operation.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetCurrentSessions => "get_current_sessions",
            Self::GetUpcomingSessions => "get_upcoming_sessions",
            Self::SearchByTopic => "search_by_topic",
            Self::SearchBySpeaker => "search_by_speaker",
            Self::GetSessionDetails => "get_session_details",
            Self::SearchByType => "search_by_type",
            Self::GetFullSchedule => "get_full_schedule",
            Self::SearchGeneral => "search_general",
        }
    }

    /// Returns all operations, in wire-name order.
    #[must_use]
    pub fn all() -> &'static [Operation] {
        &[
            Self::GetCurrentSessions,
            Self::GetUpcomingSessions,
            Self::SearchByTopic,
            Self::SearchBySpeaker,
            Self::GetSessionDetails,
            Self::SearchByType,
            Self::GetFullSchedule,
            Self::SearchGeneral,
        ]
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an operation name fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOperationError {
    /// The name that failed to parse.
    pub name: String,
}

impl fmt::Display for ParseOperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operation: {}", self.name)
    }
}

impl std::error::Error for ParseOperationError {}

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Voice AI tool definitions use snake_case; accept hyphens too.
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|op| op.name() == normalized)
            .ok_or_else(|| ParseOperationError {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_name_round_trip() {
        for op in Operation::all() {
            let parsed: Operation = op.name().parse().expect("should parse");
            assert_eq!(*op, parsed);
        }
    }

    #[test]
    fn parse_accepts_hyphens() {
        let op: Operation = "search-by-speaker".parse().expect("should parse");
        assert_eq!(op, Operation::SearchBySpeaker);
    }

    #[test]
    fn parse_unknown_name() {
        let result: Result<Operation, _> = "order_pizza".parse();
        let err = result.expect_err("should fail");
        assert_eq!(err.name, "order_pizza");
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Operation::GetSessionDetails).expect("serialize");
        assert_eq!(json, "\"get_session_details\"");
    }
}
