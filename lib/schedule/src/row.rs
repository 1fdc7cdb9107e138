//! Session rows returned by a schedule source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A conference speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    /// The speaker's display name.
    pub name: String,
    /// Optional company or affiliation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl Speaker {
    /// Creates a speaker with just a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company: None,
        }
    }

    /// Sets the company.
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }
}

/// A single session record.
///
/// Sources may omit any field; the context layer only ever reads the
/// title and the nested speaker name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRow {
    /// Session title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Speaker delivering the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<Speaker>,
    /// Session type (talk, workshop, keynote, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_type: Option<String>,
    /// Room or stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Scheduled start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    /// Scheduled end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
}

impl SessionRow {
    /// Creates a row with a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Sets the speaker.
    #[must_use]
    pub fn with_speaker(mut self, speaker: Speaker) -> Self {
        self.speaker = Some(speaker);
        self
    }

    /// Sets the session type.
    #[must_use]
    pub fn with_session_type(mut self, session_type: impl Into<String>) -> Self {
        self.session_type = Some(session_type.into());
        self
    }

    /// Sets the room.
    #[must_use]
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Sets the scheduled time window.
    #[must_use]
    pub fn with_times(mut self, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        self.starts_at = Some(starts_at);
        self.ends_at = Some(ends_at);
        self
    }

    /// Returns the speaker name, if present.
    #[must_use]
    pub fn speaker_name(&self) -> Option<&str> {
        self.speaker.as_ref().map(|s| s.name.as_str())
    }

    /// Returns the label used when this row stands in for a follow-up
    /// reference: the title, falling back to the speaker name.
    #[must_use]
    pub fn follow_up_label(&self) -> Option<&str> {
        self.title.as_deref().or_else(|| self.speaker_name())
    }
}

/// The outcome of one schedule query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// Whether the query succeeded.
    pub success: bool,
    /// Number of rows returned.
    pub count: usize,
    /// The rows, in source order.
    pub rows: Vec<SessionRow>,
    /// Optional human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl QueryOutcome {
    /// Creates a successful outcome from rows.
    #[must_use]
    pub fn success(rows: Vec<SessionRow>) -> Self {
        Self {
            success: true,
            count: rows.len(),
            rows,
            message: None,
        }
    }

    /// Creates a failed outcome with a message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            count: 0,
            rows: Vec::new(),
            message: Some(message.into()),
        }
    }

    /// Adds a message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_up_label_prefers_title() {
        let row = SessionRow::titled("Scaling Rust Services")
            .with_speaker(Speaker::named("Nia Okafor"));
        assert_eq!(row.follow_up_label(), Some("Scaling Rust Services"));
    }

    #[test]
    fn follow_up_label_falls_back_to_speaker() {
        let row = SessionRow::default().with_speaker(Speaker::named("Nia Okafor"));
        assert_eq!(row.follow_up_label(), Some("Nia Okafor"));
    }

    #[test]
    fn follow_up_label_absent_when_row_is_bare() {
        assert_eq!(SessionRow::default().follow_up_label(), None);
    }

    #[test]
    fn outcome_success_counts_rows() {
        let outcome = QueryOutcome::success(vec![
            SessionRow::titled("A"),
            SessionRow::titled("B"),
        ]);
        assert!(outcome.success);
        assert_eq!(outcome.count, 2);
    }

    #[test]
    fn outcome_failure_is_empty() {
        let outcome = QueryOutcome::failure("no such session");
        assert!(!outcome.success);
        assert_eq!(outcome.count, 0);
        assert_eq!(outcome.message.as_deref(), Some("no such session"));
    }

    #[test]
    fn row_serde_roundtrip() {
        let row = SessionRow::titled("Keynote")
            .with_speaker(Speaker::named("Grace Hopper").with_company("Navy"))
            .with_session_type("keynote");

        let json = serde_json::to_string(&row).expect("serialize");
        let parsed: SessionRow = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(row, parsed);
    }
}
