//! Read-only conversation summaries for monitoring.

use crate::state::ConversationState;
use crate::suggest;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A snapshot of one conversation's context.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    /// Session identifier.
    pub session_id: String,
    /// Seconds elapsed since the conversation started.
    pub duration_seconds: i64,
    /// Number of recorded interactions.
    pub interaction_count: usize,
    /// Current topic label, if any.
    pub current_topic: Option<String>,
    /// All tracked speakers, oldest first.
    pub mentioned_speakers: Vec<String>,
    /// All tracked session titles, oldest first.
    pub mentioned_sessions: Vec<String>,
    /// Last activity timestamp.
    pub last_activity_at: DateTime<Utc>,
    /// Current follow-up suggestions.
    pub suggestions: Vec<String>,
}

/// Projects a summary from conversation state. Never mutates.
#[must_use]
pub fn project(state: &ConversationState) -> ConversationSummary {
    ConversationSummary {
        session_id: state.session_id.clone(),
        duration_seconds: (Utc::now() - state.created_at).num_seconds(),
        interaction_count: state.interaction_count(),
        current_topic: state.current_topic.clone(),
        mentioned_speakers: state.mentioned_speakers.to_vec(),
        mentioned_sessions: state.mentioned_sessions.to_vec(),
        last_activity_at: state.last_activity_at,
        suggestions: suggest::suggestions(state),
    }
}
