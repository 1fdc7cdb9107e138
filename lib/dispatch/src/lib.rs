//! Function-call dispatch for the lectern voice assistant.
//!
//! The voice AI (or the text harness) sends function-call requests
//! tagged with a session identifier. The dispatcher resolves references
//! through the context engine, runs the schedule query, records the
//! interaction, and bundles follow-up suggestions into the reply.

pub mod dispatcher;
pub mod error;

pub use dispatcher::{DEFAULT_SESSION, Dispatcher, FunctionCall, FunctionReply};
pub use error::DispatchError;
