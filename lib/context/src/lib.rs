//! Conversational context engine for the lectern voice assistant.
//!
//! Callers on a phone line don't repeat themselves: after hearing a list
//! of sessions they say "tell me about the first one" or "what else is
//! that speaker doing". This crate tracks per-call conversation state and
//! rewrites such references into fully-specified query parameters before
//! the schedule lookup runs.
//!
//! This crate provides:
//!
//! - **Entity tracking**: Insertion-ordered, capped sets of mentioned
//!   speakers, sessions, and search terms
//! - **Conversation state**: Per-call history, last results, and topic
//! - **Reference resolver**: Ordinal, phrase, and topic-continuity passes
//! - **Context store**: Lifecycle manager with idle-timeout eviction
//! - **Suggestions and summaries**: Read-only projections for prompts
//!   and monitoring

pub mod config;
pub mod entity;
pub mod resolver;
pub mod state;
pub mod store;
pub mod suggest;
pub mod summary;

pub use config::ContextConfig;
pub use entity::OrderedSet;
pub use resolver::resolve;
pub use state::{ConversationState, InteractionId, InteractionRecord, LastQuery};
pub use store::{ContextSnapshot, ContextStore};
pub use suggest::suggestions;
pub use summary::ConversationSummary;
