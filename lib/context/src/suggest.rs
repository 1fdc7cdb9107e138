//! Follow-up suggestion generation.
//!
//! Suggestions are fixed prompts derived from the state, in a fixed
//! order: follow-ups on the last result set, then topic continuations,
//! then the most recent speaker. Deterministic on purpose; they feed
//! the voice prompt, not a ranking model.

use crate::state::ConversationState;

/// Maximum suggestions returned.
pub const MAX_SUGGESTIONS: usize = 3;

/// Derives up to [`MAX_SUGGESTIONS`] follow-up prompts from the state.
#[must_use]
pub fn suggestions(state: &ConversationState) -> Vec<String> {
    let mut prompts = Vec::new();

    if state.last_results.len() > 1 {
        prompts.push("You can ask about the second one".to_string());
        prompts.push("Ask who's speaking last".to_string());
    }

    if let Some(topic) = &state.current_topic {
        prompts.push(format!("Ask for more sessions about {topic}"));
        prompts.push("Ask what else is on at the same time".to_string());
    }

    if let Some(speaker) = state.mentioned_speakers.most_recent() {
        prompts.push(format!("Ask what else {speaker} is speaking about"));
    }

    prompts.truncate(MAX_SUGGESTIONS);
    prompts
}
