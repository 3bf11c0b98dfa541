//! User-facing event history for a monitoring session.
//!
//! Records are human-readable and rendered as a scrollable log; operator
//! diagnostics go through `tracing` instead.

pub mod log;

// Re-export commonly used types
pub use log::{EventKind, EventLog, EventRecord, Severity, DEFAULT_LOG_CAPACITY};
