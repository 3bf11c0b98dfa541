//! Core scoring and alerting for the sentinel.
//!
//! This module contains:
//! - The distress scorer (clamped leaky integrator over observations)
//! - The latching alert trigger
//! - The session aggregate that ties them to the event log
//! - Read-only snapshots for rendering

pub mod scorer;
pub mod session;
pub mod snapshot;
pub mod trigger;

// Re-export commonly used types
pub use scorer::{
    DistressScorer, DistressSignals, ScoreUpdate, DECAY_STEP, DEFAULT_EMERGENCY_GESTURES,
    ESCALATION_STEP, MAX_SCORE,
};
pub use session::{Epoch, Session, SessionError, TickOutcome};
pub use snapshot::{DistressLevel, SessionSnapshot};
pub use trigger::{AlertState, AlertTrigger, DEFAULT_THRESHOLD};
