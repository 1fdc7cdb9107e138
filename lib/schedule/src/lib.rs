//! Conference schedule query contract for the lectern voice assistant.
//!
//! This crate provides:
//!
//! - **Operations**: The named query operations callers may request
//! - **Query Parameters**: Typed parameter bag passed with each operation
//! - **Rows**: Session/speaker records returned by a schedule source
//! - **Schedule Source**: Trait abstracting the backing schedule store

pub mod error;
pub mod operation;
pub mod params;
pub mod row;
pub mod source;

pub use error::ScheduleError;
pub use operation::Operation;
pub use params::QueryParams;
pub use row::{QueryOutcome, SessionRow, Speaker};
pub use source::{ScheduleSource, StaticSchedule};
