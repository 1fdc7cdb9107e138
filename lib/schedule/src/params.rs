//! Typed query parameters.
//!
//! The voice AI sends parameters as a loose JSON object. Rather than pass
//! that bag around untyped, the fields each operation can carry are named
//! here explicitly. The context resolver's phrase-substitution pass still
//! gets to operate generically over every string-valued field via
//! [`QueryParams::string_fields_mut`].

use serde::{Deserialize, Serialize};

/// Parameters accompanying a schedule query operation.
///
/// All fields are optional; each operation reads the fields it cares
/// about and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Topic keyword for topic search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Speaker name for speaker search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_name: Option<String>,
    /// Free-text lookup for session details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_query: Option<String>,
    /// Session type (talk, workshop, keynote, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_type: Option<String>,
    /// Free-text query for general search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Maximum number of rows to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the topic.
    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Sets the speaker name.
    #[must_use]
    pub fn with_speaker_name(mut self, name: impl Into<String>) -> Self {
        self.speaker_name = Some(name.into());
        self
    }

    /// Sets the session lookup text.
    #[must_use]
    pub fn with_session_query(mut self, query: impl Into<String>) -> Self {
        self.session_query = Some(query.into());
        self
    }

    /// Sets the session type.
    #[must_use]
    pub fn with_session_type(mut self, session_type: impl Into<String>) -> Self {
        self.session_type = Some(session_type.into());
        self
    }

    /// Sets the free-text query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Sets the row limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topic.is_none()
            && self.speaker_name.is_none()
            && self.session_query.is_none()
            && self.session_type.is_none()
            && self.query.is_none()
            && self.limit.is_none()
    }

    /// Iterates mutably over every string-valued field that is set.
    pub fn string_fields_mut(&mut self) -> impl Iterator<Item = &mut String> {
        [
            self.topic.as_mut(),
            self.speaker_name.as_mut(),
            self.session_query.as_mut(),
            self.session_type.as_mut(),
            self.query.as_mut(),
        ]
        .into_iter()
        .flatten()
    }
}
