//! Context store: conversation lifecycle management.
//!
//! Owns the map from session identifier to conversation state. The store
//! is constructed at startup and injected wherever it is needed; there is
//! no global instance. Idle conversations are evicted by a background
//! sweep on a fixed interval, and every public operation is total: an
//! unknown session means a fresh state, never an error.

use crate::config::ContextConfig;
use crate::resolver;
use crate::state::ConversationState;
use crate::suggest;
use crate::summary::{self, ConversationSummary};
use chrono::{DateTime, Duration, Utc};
use lectern_schedule::{Operation, QueryOutcome, QueryParams};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

/// A lightweight per-conversation summary for monitoring.
#[derive(Debug, Clone, Serialize)]
pub struct ContextSnapshot {
    /// Session identifier.
    pub session_id: String,
    /// When the conversation started.
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp.
    pub last_activity_at: DateTime<Utc>,
    /// Number of recorded interactions.
    pub interaction_count: usize,
    /// Current topic label, if any.
    pub current_topic: Option<String>,
}

/// Tracks conversation state per active call.
///
/// All map access happens under one mutex with short hold times; the
/// resolver and entity extraction are pure computation inside the lock.
#[derive(Debug)]
pub struct ContextStore {
    config: ContextConfig,
    sessions: Mutex<HashMap<String, ConversationState>>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl ContextStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(config: ContextConfig) -> Self {
        Self {
            config,
            sessions: Mutex::new(HashMap::new()),
            sweeper: Mutex::new(None),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, ConversationState>> {
        // State stays usable even if a holder panicked mid-update.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the state for a session, creating it if absent.
    ///
    /// Refreshes the activity timestamp either way. Returns a snapshot
    /// clone; the live state stays owned by the store.
    pub fn get_or_create(&self, session_id: &str) -> ConversationState {
        let mut sessions = self.sessions();
        let state = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| ConversationState::new(session_id));
        state.touch();
        state.clone()
    }

    /// Resolves raw parameters against the session's context.
    ///
    /// Read-only: an unknown session resolves against no context and is
    /// not created here.
    #[must_use]
    pub fn resolve(
        &self,
        session_id: &str,
        operation: Operation,
        params: &QueryParams,
    ) -> QueryParams {
        let sessions = self.sessions();
        match sessions.get(session_id) {
            Some(state) => resolver::resolve(state, operation, params),
            // Nothing to resolve against yet.
            None => params.clone(),
        }
    }

    /// Records one executed interaction, creating the session if needed.
    ///
    /// Returns a snapshot of the updated state.
    pub fn record_interaction(
        &self,
        session_id: &str,
        operation: Operation,
        parameters: QueryParams,
        outcome: &QueryOutcome,
        user_query: Option<&str>,
    ) -> ConversationState {
        let mut sessions = self.sessions();
        let state = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| ConversationState::new(session_id));
        state.record(operation, parameters, outcome, user_query);
        state.clone()
    }

    /// Removes every conversation idle past the configured timeout.
    ///
    /// Expired keys are snapshotted first, then removed with a recency
    /// re-check, keeping lock hold times short relative to in-flight
    /// resolution calls.
    pub fn evict_expired(&self) -> usize {
        let cutoff = Utc::now() - Duration::minutes(self.config.idle_timeout_minutes);

        let expired: Vec<String> = {
            let sessions = self.sessions();
            sessions
                .iter()
                .filter(|(_, state)| state.idle_since(cutoff))
                .map(|(key, _)| key.clone())
                .collect()
        };
        if expired.is_empty() {
            return 0;
        }

        let mut removed = 0;
        {
            let mut sessions = self.sessions();
            for key in &expired {
                // A session touched between the scans stays alive.
                if sessions.get(key).is_some_and(|s| s.idle_since(cutoff)) {
                    sessions.remove(key);
                    removed += 1;
                }
            }
        }
        if removed > 0 {
            tracing::info!(evicted = removed, "removed idle conversations");
        }
        removed
    }

    /// Removes a session; returns whether anything was removed.
    pub fn clear(&self, session_id: &str) -> bool {
        self.sessions().remove(session_id).is_some()
    }

    /// Number of tracked conversations.
    #[must_use]
    pub fn count(&self) -> usize {
        self.sessions().len()
    }

    /// Lightweight summaries of every tracked conversation.
    #[must_use]
    pub fn snapshot_all(&self) -> Vec<ContextSnapshot> {
        self.sessions()
            .values()
            .map(|state| ContextSnapshot {
                session_id: state.session_id.clone(),
                created_at: state.created_at,
                last_activity_at: state.last_activity_at,
                interaction_count: state.interaction_count(),
                current_topic: state.current_topic.clone(),
            })
            .collect()
    }

    /// Follow-up suggestions for a session. Empty for unknown sessions.
    #[must_use]
    pub fn suggest(&self, session_id: &str) -> Vec<String> {
        self.sessions()
            .get(session_id)
            .map(suggest::suggestions)
            .unwrap_or_default()
    }

    /// Summary of a session's context, or `None` if never seen.
    #[must_use]
    pub fn summarize(&self, session_id: &str) -> Option<ConversationSummary> {
        self.sessions().get(session_id).map(summary::project)
    }

    /// Starts the background eviction sweep.
    ///
    /// Holds only a weak reference to the store, so dropping the last
    /// strong handle stops the task. Calling this twice is a no-op.
    pub fn start_sweeper(self: &Arc<Self>) {
        let mut sweeper = self.sweeper.lock().unwrap_or_else(PoisonError::into_inner);
        if sweeper.is_some() {
            return;
        }

        let weak = Arc::downgrade(self);
        let period = std::time::Duration::from_secs(self.config.sweep_interval_seconds);
        *sweeper = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick fires immediately; skip it so a fresh store
            // doesn't sweep before anything can expire.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(store) = weak.upgrade() else { break };
                store.evict_expired();
            }
        }));
    }

    /// Stops the sweeper and drops all conversation state.
    ///
    /// Safe to call repeatedly, and safe to call if the sweeper was
    /// never started.
    pub fn shutdown(&self) {
        let handle = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
        self.sessions().clear();
    }
}

impl Drop for ContextStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_schedule::{SessionRow, Speaker};

    fn store() -> ContextStore {
        ContextStore::new(ContextConfig::default())
    }

    fn speaker_outcome() -> QueryOutcome {
        QueryOutcome::success(vec![
            SessionRow::titled("Opening Keynote").with_speaker(Speaker::named("Jason Lengstorf")),
            SessionRow::titled("Closing Panel"),
        ])
    }

    fn backdate(store: &ContextStore, session_id: &str, minutes: i64) {
        let mut sessions = store.sessions();
        let state = sessions.get_mut(session_id).expect("session exists");
        state.last_activity_at = Utc::now() - Duration::minutes(minutes);
    }

    #[test]
    fn get_or_create_returns_fresh_empty_state() {
        let store = store();
        let state = store.get_or_create("call-1");

        assert_eq!(state.session_id, "call-1");
        assert!(state.history.is_empty());
        assert!(state.current_topic.is_none());
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn get_or_create_refreshes_activity() {
        let store = store();
        store.get_or_create("call-1");
        backdate(&store, "call-1", 5);

        let state = store.get_or_create("call-1");

        assert!(Utc::now() - state.last_activity_at < Duration::seconds(5));
    }

    #[test]
    fn resolve_does_not_create_sessions() {
        let store = store();
        let params = QueryParams::new().with_session_query("the first one");

        let resolved = store.resolve("never-seen", Operation::GetSessionDetails, &params);

        assert_eq!(resolved, params);
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn record_then_resolve_follow_up() {
        let store = store();
        store.record_interaction(
            "call-1",
            Operation::GetUpcomingSessions,
            QueryParams::new(),
            &speaker_outcome(),
            None,
        );

        let resolved = store.resolve(
            "call-1",
            Operation::GetSessionDetails,
            &QueryParams::new().with_session_query("the first one"),
        );

        assert_eq!(resolved.session_query.as_deref(), Some("Opening Keynote"));
    }

    #[test]
    fn eviction_honours_timeout_boundary() {
        let store = store();
        store.get_or_create("stale");
        store.get_or_create("fresh");
        backdate(&store, "stale", 11);
        backdate(&store, "fresh", 9);

        let removed = store.evict_expired();

        assert_eq!(removed, 1);
        assert_eq!(store.count(), 1);
        assert!(store.summarize("stale").is_none());
        assert!(store.summarize("fresh").is_some());
    }

    #[test]
    fn evicted_session_starts_over() {
        let store = store();
        store.record_interaction(
            "call-1",
            Operation::SearchByTopic,
            QueryParams::new().with_topic("rust"),
            &speaker_outcome(),
            None,
        );
        backdate(&store, "call-1", 11);
        store.evict_expired();

        let state = store.get_or_create("call-1");

        assert!(state.history.is_empty());
        assert!(state.current_topic.is_none());
    }

    #[test]
    fn clear_reports_removal() {
        let store = store();
        store.get_or_create("call-1");

        assert!(store.clear("call-1"));
        assert!(!store.clear("call-1"));
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn snapshot_all_exposes_monitoring_fields() {
        let store = store();
        store.record_interaction(
            "call-1",
            Operation::SearchByTopic,
            QueryParams::new().with_topic("rust"),
            &speaker_outcome(),
            None,
        );

        let snapshots = store.snapshot_all();

        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].session_id, "call-1");
        assert_eq!(snapshots[0].interaction_count, 1);
        assert_eq!(snapshots[0].current_topic.as_deref(), Some("rust"));
    }

    #[test]
    fn summarize_unknown_session_is_none() {
        let store = store();
        assert!(store.summarize("never-seen").is_none());
    }

    #[test]
    fn summarize_counts_interactions_up_to_cap() {
        let store = store();
        for i in 0..12 {
            store.record_interaction(
                "call-1",
                Operation::SearchGeneral,
                QueryParams::new().with_query(format!("q{i}")),
                &QueryOutcome::success(Vec::new()),
                None,
            );
        }

        let summary = store.summarize("call-1").expect("summary");
        assert_eq!(summary.interaction_count, 10);
    }

    #[test]
    fn suggest_unknown_session_is_empty() {
        let store = store();
        assert!(store.suggest("never-seen").is_empty());
    }

    #[tokio::test]
    async fn sweeper_removes_idle_sessions() {
        let config = ContextConfig {
            idle_timeout_minutes: 10,
            sweep_interval_seconds: 1,
        };
        let store = Arc::new(ContextStore::new(config));
        store.get_or_create("stale");
        backdate(&store, "stale", 11);

        store.start_sweeper();
        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;

        assert_eq!(store.count(), 0);
        store.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let store = Arc::new(ContextStore::new(ContextConfig::default()));
        store.get_or_create("call-1");
        store.start_sweeper();

        store.shutdown();
        store.shutdown();

        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn shutdown_without_sweeper_is_safe() {
        let store = store();
        store.shutdown();
    }

    #[tokio::test]
    async fn start_sweeper_twice_is_a_no_op() {
        let store = Arc::new(ContextStore::new(ContextConfig::default()));
        store.start_sweeper();
        store.start_sweeper();
        store.shutdown();
    }
}
