//! Reference resolution.
//!
//! Rewrites referential and elliptical queries ("the first one", "that
//! speaker", "similar sessions") into concrete parameters using the
//! conversation state. Three passes run in a fixed order, each feeding
//! the next:
//!
//! 1. **Follow-up**: ordinal references into the last result set, and a
//!    missing speaker name taken from the last results
//! 2. **Phrase substitution**: "that speaker" / "that session" / "that
//!    topic" replaced from the tracked entities
//! 3. **Continuity**: "similar" / "related" topic queries replaced with
//!    the current topic
//!
//! Resolution is a pure function of the state and the raw parameters;
//! it never mutates the state and never fails. A reference with nothing
//! to resolve against leaves the parameter untouched.

use crate::state::ConversationState;
use lectern_schedule::{Operation, QueryParams};

/// Position an ordinal word maps to within the last result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrdinalSlot {
    /// Zero-based index.
    Index(usize),
    /// The final element.
    Last,
}

/// Ordinal words checked in order; the first substring match wins.
///
/// The order is load-bearing: "first" sits ahead of "1st" and both ahead
/// of the later entries, so a query like "first 5 sessions" resolves as
/// ordinal zero. This is deliberate pattern matching, not language
/// understanding.
const ORDINALS: &[(&str, OrdinalSlot)] = &[
    ("first", OrdinalSlot::Index(0)),
    ("1st", OrdinalSlot::Index(0)),
    ("second", OrdinalSlot::Index(1)),
    ("2nd", OrdinalSlot::Index(1)),
    ("third", OrdinalSlot::Index(2)),
    ("3rd", OrdinalSlot::Index(2)),
    ("fourth", OrdinalSlot::Index(3)),
    ("4th", OrdinalSlot::Index(3)),
    ("fifth", OrdinalSlot::Index(4)),
    ("5th", OrdinalSlot::Index(4)),
    ("last", OrdinalSlot::Last),
    ("latest", OrdinalSlot::Last),
    ("newest", OrdinalSlot::Last),
];

/// Phrases that refer back to the most recently mentioned speaker.
const SPEAKER_PHRASES: &[&str] = &["that speaker", "the speaker"];
/// Phrases that refer back to the most recently mentioned session.
const SESSION_PHRASES: &[&str] = &["that session", "the session"];
/// Phrases that refer back to the current topic.
const TOPIC_PHRASES: &[&str] = &["same topic", "that topic"];
/// Markers for more-of-the-same topic queries.
const CONTINUITY_MARKERS: &[&str] = &["similar", "related", "like this"];

/// Resolves raw parameters against the conversation state.
#[must_use]
pub fn resolve(
    state: &ConversationState,
    operation: Operation,
    params: &QueryParams,
) -> QueryParams {
    let params = follow_up_pass(state, operation, params.clone());
    let params = phrase_pass(state, params);
    continuity_pass(state, params)
}

fn ordinal_slot(text: &str) -> Option<OrdinalSlot> {
    let lower = text.to_lowercase();
    ORDINALS
        .iter()
        .find(|(word, _)| lower.contains(word))
        .map(|(_, slot)| *slot)
}

/// Pass 1: ordinal and elided-speaker follow-ups against the last
/// result set. Does nothing when there are no last results.
fn follow_up_pass(
    state: &ConversationState,
    operation: Operation,
    mut params: QueryParams,
) -> QueryParams {
    if state.last_results.is_empty() {
        return params;
    }

    match operation {
        Operation::GetSessionDetails => {
            if let Some(slot) = params.session_query.as_deref().and_then(ordinal_slot) {
                let index = match slot {
                    OrdinalSlot::Index(i) => i,
                    OrdinalSlot::Last => state.last_results.len() - 1,
                };
                // Out of range: keep the original text untouched.
                if let Some(label) = state
                    .last_results
                    .get(index)
                    .and_then(|row| row.follow_up_label())
                {
                    params.session_query = Some(label.to_string());
                }
            }
        }
        Operation::SearchBySpeaker if params.speaker_name.is_none() => {
            if let Some(name) = state
                .last_results
                .iter()
                .find_map(|row| row.speaker_name())
            {
                params.speaker_name = Some(name.to_string());
            }
        }
        _ => {}
    }
    params
}

/// Pass 2: phrase substitution over every string-valued parameter.
fn phrase_pass(state: &ConversationState, mut params: QueryParams) -> QueryParams {
    let speaker = state.mentioned_speakers.most_recent().map(str::to_string);
    let session = state.mentioned_sessions.most_recent().map(str::to_string);
    let topic = state
        .current_topic
        .as_deref()
        .filter(|t| !t.starts_with("speaker: "))
        .map(|t| t.strip_prefix("type: ").unwrap_or(t).to_string());

    for field in params.string_fields_mut() {
        if let Some(speaker) = &speaker {
            replace_phrases(field, SPEAKER_PHRASES, speaker);
        }
        if let Some(session) = &session {
            replace_phrases(field, SESSION_PHRASES, session);
        }
        if let Some(topic) = &topic {
            replace_phrases(field, TOPIC_PHRASES, topic);
        }
    }
    params
}

/// Pass 3: "similar"/"related" topic queries continue the current topic.
fn continuity_pass(state: &ConversationState, mut params: QueryParams) -> QueryParams {
    let Some(current_topic) = &state.current_topic else {
        return params;
    };
    if let Some(topic_param) = &params.topic {
        let lower = topic_param.to_lowercase();
        if CONTINUITY_MARKERS.iter().any(|m| lower.contains(m)) {
            let stripped = current_topic
                .strip_prefix("speaker: ")
                .or_else(|| current_topic.strip_prefix("type: "))
                .unwrap_or(current_topic);
            params.topic = Some(stripped.to_string());
        }
    }
    params
}

/// Replaces every case-insensitive occurrence of each phrase in place.
///
/// Index math runs over the ASCII-lowercased copy, which preserves byte
/// offsets for the original text.
fn replace_phrases(text: &mut String, phrases: &[&str], replacement: &str) {
    for phrase in phrases {
        let lower_text = text.to_ascii_lowercase();
        let lower_phrase = phrase.to_ascii_lowercase();
        if !lower_text.contains(&lower_phrase) {
            continue;
        }

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        while let Some(pos) = lower_text[cursor..].find(&lower_phrase) {
            let start = cursor + pos;
            out.push_str(&text[cursor..start]);
            out.push_str(replacement);
            cursor = start + lower_phrase.len();
        }
        out.push_str(&text[cursor..]);
        *text = out;
    }
}
