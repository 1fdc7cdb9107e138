//! The function-call dispatcher.

use crate::error::DispatchError;
use lectern_context::{ContextStore, ConversationSummary};
use lectern_schedule::{Operation, QueryParams, ScheduleSource, SessionRow};
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Session identifier used when the caller supplies none.
pub const DEFAULT_SESSION: &str = "default";

/// An inbound function-call request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Conversation/call identifier; defaults to [`DEFAULT_SESSION`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// The requested operation.
    pub operation: Operation,
    /// Raw, possibly referential parameters.
    #[serde(default)]
    pub parameters: QueryParams,
    /// The caller's original free-text query, when the voice layer
    /// passes it through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_query: Option<String>,
}

impl FunctionCall {
    /// Creates a call for an operation with empty parameters.
    #[must_use]
    pub fn new(operation: Operation) -> Self {
        Self {
            session_id: None,
            operation,
            parameters: QueryParams::new(),
            user_query: None,
        }
    }

    /// Sets the session identifier.
    #[must_use]
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Sets the parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: QueryParams) -> Self {
        self.parameters = parameters;
        self
    }

    /// Sets the original user query.
    #[must_use]
    pub fn with_user_query(mut self, query: impl Into<String>) -> Self {
        self.user_query = Some(query.into());
        self
    }

    /// Returns the effective session key.
    #[must_use]
    pub fn session_key(&self) -> &str {
        self.session_id.as_deref().unwrap_or(DEFAULT_SESSION)
    }
}

/// The outbound reply for one function call.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionReply {
    /// Whether the query succeeded.
    pub success: bool,
    /// Number of rows.
    pub count: usize,
    /// Result rows, in source order.
    pub rows: Vec<SessionRow>,
    /// Source-provided message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Follow-up suggestions for the caller.
    pub suggestions: Vec<String>,
}

impl FunctionReply {
    /// A short line suitable for reading out to a caller.
    ///
    /// Formats from the rows actually present; the source-reported
    /// count is not trusted to agree with them.
    #[must_use]
    pub fn spoken_message(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        match self.rows.len() {
            0 => "I didn't find anything matching that.".to_string(),
            1 => match self.rows[0].follow_up_label() {
                Some(label) => format!("I found one: {label}."),
                None => "I found one session.".to_string(),
            },
            n => {
                let titles: Vec<&str> = self
                    .rows
                    .iter()
                    .filter_map(|row| row.follow_up_label())
                    .take(3)
                    .collect();
                format!("I found {n} sessions, including {}.", titles.join(", "))
            }
        }
    }
}

/// Dispatches function calls through the context engine and the
/// schedule source.
pub struct Dispatcher {
    source: Arc<dyn ScheduleSource>,
    store: Arc<ContextStore>,
}

impl Dispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(source: Arc<dyn ScheduleSource>, store: Arc<ContextStore>) -> Self {
        Self { source, store }
    }

    /// Handles one function call: resolve, fetch, record, suggest.
    #[instrument(skip(self, call), fields(operation = %call.operation, session = call.session_key()))]
    pub async fn handle(&self, call: FunctionCall) -> Result<FunctionReply, Report<DispatchError>> {
        let session = call.session_key().to_string();

        let resolved = self
            .store
            .resolve(&session, call.operation, &call.parameters);
        if resolved != call.parameters {
            debug!(?resolved, "rewrote referential parameters");
        }

        let outcome = self
            .source
            .fetch(call.operation, &resolved)
            .await
            .map_err(|e| DispatchError::ScheduleFetch {
                operation: call.operation.name().to_string(),
                reason: e.to_string(),
            })?;

        self.store.record_interaction(
            &session,
            call.operation,
            resolved,
            &outcome,
            call.user_query.as_deref(),
        );
        let suggestions = self.store.suggest(&session);

        Ok(FunctionReply {
            success: outcome.success,
            count: outcome.count,
            rows: outcome.rows,
            message: outcome.message,
            suggestions,
        })
    }

    /// Summary of a session's context, or `None` if never seen.
    #[must_use]
    pub fn summarize(&self, session_id: &str) -> Option<ConversationSummary> {
        self.store.summarize(session_id)
    }

    /// The underlying context store.
    #[must_use]
    pub fn context(&self) -> &Arc<ContextStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_context::ContextConfig;
    use lectern_schedule::{Speaker, StaticSchedule};

    fn dispatcher() -> Dispatcher {
        use chrono::{Duration, Utc};

        let now = Utc::now();
        let schedule = StaticSchedule::new(vec![
            SessionRow::titled("Opening Keynote")
                .with_speaker(Speaker::named("Jason Lengstorf"))
                .with_session_type("keynote")
                .with_times(now + Duration::hours(1), now + Duration::hours(2)),
            SessionRow::titled("Leading Teams")
                .with_speaker(Speaker::named("Maria Santos"))
                .with_session_type("talk")
                .with_times(now + Duration::hours(2), now + Duration::hours(3)),
            SessionRow::titled("Rust Workshop")
                .with_speaker(Speaker::named("Priya Raghavan"))
                .with_session_type("workshop")
                .with_times(now + Duration::hours(3), now + Duration::hours(4)),
        ])
        .with_now(now);

        Dispatcher::new(
            Arc::new(schedule),
            Arc::new(ContextStore::new(ContextConfig::default())),
        )
    }

    #[tokio::test]
    async fn follow_up_call_resolves_ordinal_reference() {
        let dispatcher = dispatcher();

        let listing = dispatcher
            .handle(FunctionCall::new(Operation::GetUpcomingSessions).with_session("call-1"))
            .await
            .expect("dispatch");
        assert_eq!(listing.count, 3);

        let detail = dispatcher
            .handle(
                FunctionCall::new(Operation::GetSessionDetails)
                    .with_session("call-1")
                    .with_parameters(
                        QueryParams::new().with_session_query("tell me about the second one"),
                    ),
            )
            .await
            .expect("dispatch");

        assert_eq!(detail.count, 1);
        assert_eq!(detail.rows[0].title.as_deref(), Some("Leading Teams"));
    }

    #[tokio::test]
    async fn that_speaker_resolves_across_calls() {
        let dispatcher = dispatcher();

        dispatcher
            .handle(
                FunctionCall::new(Operation::SearchBySpeaker)
                    .with_session("call-1")
                    .with_parameters(QueryParams::new().with_speaker_name("Maria Santos")),
            )
            .await
            .expect("dispatch");

        let reply = dispatcher
            .handle(
                FunctionCall::new(Operation::SearchBySpeaker)
                    .with_session("call-1")
                    .with_parameters(QueryParams::new().with_speaker_name("that speaker")),
            )
            .await
            .expect("dispatch");

        assert_eq!(reply.count, 1);
        assert_eq!(reply.rows[0].title.as_deref(), Some("Leading Teams"));
    }

    #[tokio::test]
    async fn missing_session_id_falls_back_to_default() {
        let dispatcher = dispatcher();

        dispatcher
            .handle(FunctionCall::new(Operation::GetUpcomingSessions))
            .await
            .expect("dispatch");

        assert!(dispatcher.summarize(DEFAULT_SESSION).is_some());
        assert!(dispatcher.summarize("call-1").is_none());
    }

    #[tokio::test]
    async fn reply_carries_suggestions_after_listing() {
        let dispatcher = dispatcher();

        let reply = dispatcher
            .handle(FunctionCall::new(Operation::GetUpcomingSessions).with_session("call-1"))
            .await
            .expect("dispatch");

        assert!(!reply.suggestions.is_empty());
        assert!(reply.suggestions.len() <= 3);
    }

    #[tokio::test]
    async fn failed_source_query_still_records() {
        let dispatcher = dispatcher();

        // Topic search without a topic: source reports failure.
        let reply = dispatcher
            .handle(FunctionCall::new(Operation::SearchByTopic).with_session("call-1"))
            .await
            .expect("dispatch");

        assert!(!reply.success);
        let summary = dispatcher.summarize("call-1").expect("summary");
        assert_eq!(summary.interaction_count, 1);
    }

    #[test]
    fn spoken_message_mentions_titles() {
        let reply = FunctionReply {
            success: true,
            count: 2,
            rows: vec![
                SessionRow::titled("Opening Keynote"),
                SessionRow::titled("Leading Teams"),
            ],
            message: None,
            suggestions: Vec::new(),
        };

        let spoken = reply.spoken_message();
        assert!(spoken.contains("2 sessions"));
        assert!(spoken.contains("Opening Keynote"));
    }

    #[test]
    fn spoken_message_tolerates_count_row_mismatch() {
        // Sources are opaque; one claiming a row while returning none
        // must not break reply formatting.
        let reply = FunctionReply {
            success: true,
            count: 1,
            rows: Vec::new(),
            message: None,
            suggestions: Vec::new(),
        };
        assert!(reply.spoken_message().contains("didn't find"));
    }

    #[test]
    fn spoken_message_for_empty_result() {
        let reply = FunctionReply {
            success: true,
            count: 0,
            rows: Vec::new(),
            message: None,
            suggestions: Vec::new(),
        };
        assert!(reply.spoken_message().contains("didn't find"));
    }
}
