//! Schedule source abstraction and the in-memory implementation.
//!
//! Production deployments back this trait with the conference database;
//! the in-memory [`StaticSchedule`] serves tests and the text harness.

use crate::error::ScheduleError;
use crate::operation::Operation;
use crate::params::QueryParams;
use crate::row::{QueryOutcome, SessionRow};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

/// Trait for schedule query backends.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Evaluates one operation against the schedule.
    async fn fetch(
        &self,
        operation: Operation,
        params: &QueryParams,
    ) -> Result<QueryOutcome, ScheduleError>;
}

/// An in-memory schedule over a fixed list of rows.
#[derive(Debug, Clone, Default)]
pub struct StaticSchedule {
    rows: Vec<SessionRow>,
    now_override: Option<DateTime<Utc>>,
}

impl StaticSchedule {
    /// Creates a schedule from rows.
    #[must_use]
    pub fn new(rows: Vec<SessionRow>) -> Self {
        Self {
            rows,
            now_override: None,
        }
    }

    /// Pins "now" to a fixed instant for current/upcoming queries.
    #[must_use]
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now_override = Some(now);
        self
    }

    /// A small demo schedule, with times laid out around construction time.
    #[must_use]
    pub fn sample() -> Self {
        use crate::row::Speaker;

        let now = Utc::now();
        let rows = vec![
            SessionRow::titled("Opening Keynote: The Next Decade of the Web")
                .with_speaker(Speaker::named("Jason Lengstorf").with_company("CodeTV"))
                .with_session_type("keynote")
                .with_room("Main Stage")
                .with_times(now - Duration::minutes(30), now + Duration::minutes(30)),
            SessionRow::titled("Leading Engineering Teams Through Change")
                .with_speaker(Speaker::named("Maria Santos"))
                .with_session_type("talk")
                .with_room("Room A")
                .with_times(now - Duration::minutes(10), now + Duration::minutes(50)),
            SessionRow::titled("Hands-on Rust for TypeScript Developers")
                .with_speaker(Speaker::named("Priya Raghavan"))
                .with_session_type("workshop")
                .with_room("Workshop Hall")
                .with_times(now + Duration::hours(1), now + Duration::hours(3)),
            SessionRow::titled("Leadership Beyond the Org Chart")
                .with_speaker(Speaker::named("Maria Santos"))
                .with_session_type("talk")
                .with_room("Room B")
                .with_times(now + Duration::hours(2), now + Duration::hours(3)),
            SessionRow::titled("Shipping AI Features Without Shipping Regret")
                .with_speaker(Speaker::named("Devon Clarke"))
                .with_session_type("talk")
                .with_room("Room A")
                .with_times(now + Duration::hours(4), now + Duration::hours(5)),
        ];
        Self::new(rows)
    }

    fn now(&self) -> DateTime<Utc> {
        self.now_override.unwrap_or_else(Utc::now)
    }

    fn matching<F>(&self, predicate: F) -> Vec<SessionRow>
    where
        F: Fn(&SessionRow) -> bool,
    {
        self.rows.iter().filter(|r| predicate(r)).cloned().collect()
    }

    fn apply_limit(mut rows: Vec<SessionRow>, params: &QueryParams) -> Vec<SessionRow> {
        if let Some(limit) = params.limit {
            rows.truncate(limit);
        }
        rows
    }
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

#[async_trait]
impl ScheduleSource for StaticSchedule {
    async fn fetch(
        &self,
        operation: Operation,
        params: &QueryParams,
    ) -> Result<QueryOutcome, ScheduleError> {
        let now = self.now();
        let outcome = match operation {
            Operation::GetCurrentSessions => {
                let rows = self.matching(|r| {
                    matches!((r.starts_at, r.ends_at), (Some(start), Some(end)) if start <= now && now < end)
                });
                QueryOutcome::success(Self::apply_limit(rows, params))
            }
            Operation::GetUpcomingSessions => {
                let mut rows =
                    self.matching(|r| r.starts_at.is_some_and(|start| start > now));
                rows.sort_by_key(|r| r.starts_at);
                QueryOutcome::success(Self::apply_limit(rows, params))
            }
            Operation::SearchByTopic => match &params.topic {
                Some(topic) => {
                    let rows = self.matching(|r| contains_ci(r.title.as_deref(), topic));
                    QueryOutcome::success(Self::apply_limit(rows, params))
                }
                None => QueryOutcome::failure("topic search needs a topic"),
            },
            Operation::SearchBySpeaker => match &params.speaker_name {
                Some(name) => {
                    let rows = self.matching(|r| contains_ci(r.speaker_name(), name));
                    QueryOutcome::success(Self::apply_limit(rows, params))
                }
                None => QueryOutcome::failure("speaker search needs a speaker name"),
            },
            Operation::GetSessionDetails => match &params.session_query {
                Some(query) => {
                    let rows = self.matching(|r| {
                        contains_ci(r.title.as_deref(), query)
                            || contains_ci(r.speaker_name(), query)
                    });
                    match rows.into_iter().next() {
                        Some(row) => QueryOutcome::success(vec![row]),
                        None => QueryOutcome::failure("no session matched that description"),
                    }
                }
                None => QueryOutcome::failure("session details need a description"),
            },
            Operation::SearchByType => match &params.session_type {
                Some(session_type) => {
                    let rows =
                        self.matching(|r| contains_ci(r.session_type.as_deref(), session_type));
                    QueryOutcome::success(Self::apply_limit(rows, params))
                }
                None => QueryOutcome::failure("type search needs a session type"),
            },
            Operation::GetFullSchedule => {
                QueryOutcome::success(Self::apply_limit(self.rows.clone(), params))
            }
            Operation::SearchGeneral => match &params.query {
                Some(query) => {
                    let rows = self.matching(|r| {
                        contains_ci(r.title.as_deref(), query)
                            || contains_ci(r.speaker_name(), query)
                            || contains_ci(r.session_type.as_deref(), query)
                    });
                    QueryOutcome::success(Self::apply_limit(rows, params))
                }
                None => QueryOutcome::failure("general search needs a query"),
            },
        };
        Ok(outcome)
    }
}
