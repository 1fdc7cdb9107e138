//! Per-call conversation state.
//!
//! One [`ConversationState`] exists per live call (or harness session).
//! It carries the bounded interaction history, the most recent query and
//! its result rows, the current topic label, and the capped entity sets
//! the resolver substitutes from.

use crate::entity::OrderedSet;
use chrono::{DateTime, Utc};
use lectern_schedule::{Operation, QueryOutcome, QueryParams, SessionRow};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use ulid::Ulid;

/// Maximum interaction records kept per conversation.
pub const HISTORY_CAP: usize = 10;
/// Maximum mentioned speakers tracked per conversation.
pub const MENTIONED_SPEAKERS_CAP: usize = 20;
/// Maximum mentioned session titles tracked per conversation.
pub const MENTIONED_SESSIONS_CAP: usize = 15;
/// Maximum recent search terms tracked per conversation.
pub const RECENT_TERMS_CAP: usize = 10;

/// Unique identifier for an interaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionId(Ulid);

impl InteractionId {
    /// Creates a new interaction ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for InteractionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ixn_{}", self.0)
    }
}

/// One recorded function-call interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Unique identifier.
    pub id: InteractionId,
    /// When the interaction happened.
    pub timestamp: DateTime<Utc>,
    /// The operation that ran.
    pub operation: Operation,
    /// The resolved parameters it ran with.
    pub parameters: QueryParams,
    /// How many rows came back.
    pub result_count: usize,
    /// The caller's original free-text query, when known.
    pub user_query: Option<String>,
    /// Whether the query succeeded.
    pub success: bool,
}

/// The most recently executed query and its rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastQuery {
    /// Operation name.
    pub operation: Operation,
    /// Resolved parameters.
    pub parameters: QueryParams,
    /// Raw result rows.
    pub results: Vec<SessionRow>,
}

/// Conversation state for one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    /// Opaque session/call identifier.
    pub session_id: String,
    /// When the conversation started.
    pub created_at: DateTime<Utc>,
    /// Last time this state was touched. Sliding: refreshed on every
    /// access, never moves backwards.
    pub last_activity_at: DateTime<Utc>,
    /// The most recent interactions, oldest first, trimmed to
    /// [`HISTORY_CAP`].
    pub history: Vec<InteractionRecord>,
    /// The most recently executed query.
    pub last_query: Option<LastQuery>,
    /// Rows from the most recent query. Ordinal references ("the first
    /// one") resolve against this sequence.
    pub last_results: Vec<SessionRow>,
    /// Normalized label for what the conversation is currently about.
    pub current_topic: Option<String>,
    /// Speakers mentioned so far, oldest first.
    pub mentioned_speakers: OrderedSet,
    /// Session titles mentioned so far, oldest first.
    pub mentioned_sessions: OrderedSet,
    /// Recent search terms, oldest first.
    pub recent_search_terms: OrderedSet,
    /// Reserved for future personalization; resolution never reads it.
    pub user_preferences: HashMap<String, JsonValue>,
}

impl ConversationState {
    /// Creates an empty state for a session.
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            created_at: now,
            last_activity_at: now,
            history: Vec::new(),
            last_query: None,
            last_results: Vec::new(),
            current_topic: None,
            mentioned_speakers: OrderedSet::with_cap(MENTIONED_SPEAKERS_CAP),
            mentioned_sessions: OrderedSet::with_cap(MENTIONED_SESSIONS_CAP),
            recent_search_terms: OrderedSet::with_cap(RECENT_TERMS_CAP),
            user_preferences: HashMap::new(),
        }
    }

    /// Refreshes the activity timestamp.
    pub fn touch(&mut self) {
        let now = Utc::now();
        if now > self.last_activity_at {
            self.last_activity_at = now;
        }
    }

    /// Returns the number of recorded interactions (capped at
    /// [`HISTORY_CAP`]).
    #[must_use]
    pub fn interaction_count(&self) -> usize {
        self.history.len()
    }

    /// Returns true if this state has been idle since before the cutoff.
    #[must_use]
    pub fn idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_activity_at < cutoff
    }

    /// Records one executed interaction.
    ///
    /// Appends to the history (trimmed to the last [`HISTORY_CAP`]),
    /// replaces the last query and result rows, folds entities from the
    /// parameters and rows into the capped sets, and updates the current
    /// topic from the operation.
    pub fn record(
        &mut self,
        operation: Operation,
        parameters: QueryParams,
        outcome: &QueryOutcome,
        user_query: Option<&str>,
    ) {
        self.history.push(InteractionRecord {
            id: InteractionId::new(),
            timestamp: Utc::now(),
            operation,
            parameters: parameters.clone(),
            result_count: outcome.count,
            user_query: user_query.map(str::to_string),
            success: outcome.success,
        });
        if self.history.len() > HISTORY_CAP {
            let excess = self.history.len() - HISTORY_CAP;
            self.history.drain(..excess);
        }

        self.extract_entities(&parameters, &outcome.rows);
        self.update_topic(operation, &parameters);

        self.last_results = outcome.rows.clone();
        self.last_query = Some(LastQuery {
            operation,
            parameters,
            results: outcome.rows.clone(),
        });
        self.touch();
    }

    fn extract_entities(&mut self, parameters: &QueryParams, rows: &[SessionRow]) {
        if let Some(name) = &parameters.speaker_name {
            self.mentioned_speakers.insert(name);
            self.recent_search_terms.insert(name);
        }
        if let Some(topic) = &parameters.topic {
            self.recent_search_terms.insert(topic);
        }
        if let Some(query) = &parameters.query {
            self.recent_search_terms.insert(query);
        }
        for row in rows {
            if let Some(name) = row.speaker_name() {
                self.mentioned_speakers.insert(name);
            }
            if let Some(title) = &row.title {
                self.mentioned_sessions.insert(title);
            }
        }
    }

    fn update_topic(&mut self, operation: Operation, parameters: &QueryParams) {
        match operation {
            Operation::SearchByTopic => {
                if let Some(topic) = &parameters.topic {
                    self.current_topic = Some(topic.to_lowercase());
                }
            }
            Operation::SearchBySpeaker => {
                if let Some(name) = &parameters.speaker_name {
                    self.current_topic = Some(format!("speaker: {}", name.to_lowercase()));
                }
            }
            Operation::SearchByType => {
                if let Some(session_type) = &parameters.session_type {
                    self.current_topic = Some(format!("type: {}", session_type.to_lowercase()));
                }
            }
            Operation::GetCurrentSessions => {
                self.current_topic = Some("current sessions".to_string());
            }
            Operation::GetUpcomingSessions => {
                self.current_topic = Some("upcoming sessions".to_string());
            }
            // Detail lookups and general search keep the topic as-is.
            _ => {}
        }
    }
}
