//! Observation sources for the sentinel.
//!
//! A source stands in for the camera-backed emotion and gesture classifiers.
//! The scorer only sees [`Observation`] values, so any implementation (random
//! mock, replayed fixture, real model) can drive a session unchanged.

pub mod mock;
pub mod replay;
pub mod types;

use thiserror::Error;

// Re-export commonly used types
pub use mock::MockSource;
pub use replay::ReplaySource;
pub use types::{EmotionReading, GestureInfo, Observation, ObservationError, NO_GESTURE};

/// Errors a source can report instead of an observation.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying capability (e.g. camera) was refused or lost.
    #[error("capture denied: {0}")]
    Denied(String),

    /// A finite source has no more observations.
    #[error("source exhausted")]
    Exhausted,

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces the next observation for a tick.
pub trait ObservationSource: Send {
    fn next_observation(&mut self) -> Result<Observation, SourceError>;
}

impl<F> ObservationSource for F
where
    F: FnMut() -> Result<Observation, SourceError> + Send,
{
    fn next_observation(&mut self) -> Result<Observation, SourceError> {
        self()
    }
}
