//! Latching alert trigger.
//!
//! Once the score reaches the threshold the trigger latches TRIGGERED and
//! stays there until the session restarts, whatever the score does next.

use serde::{Deserialize, Serialize};

/// Default alert threshold.
pub const DEFAULT_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    Armed,
    Triggered,
}

/// Pure transition function.
///
/// Returns the next state and whether this call fired the alert.
pub fn evaluate(score: u32, state: AlertState, threshold: u32) -> (AlertState, bool) {
    match state {
        AlertState::Armed if score >= threshold => (AlertState::Triggered, true),
        state => (state, false),
    }
}

/// Holds the alert state for one session.
#[derive(Debug, Clone)]
pub struct AlertTrigger {
    threshold: u32,
    state: AlertState,
}

impl AlertTrigger {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            state: AlertState::Armed,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    pub fn is_triggered(&self) -> bool {
        self.state == AlertState::Triggered
    }

    /// Evaluate a new score, returning `true` exactly when the alert fires.
    pub fn evaluate(&mut self, score: u32) -> bool {
        let (next, fired) = evaluate(score, self.state, self.threshold);
        self.state = next;
        fired
    }

    /// Re-arm for a new session.
    pub fn rearm(&mut self) {
        self.state = AlertState::Armed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        assert_eq!(evaluate(9, AlertState::Armed, 10), (AlertState::Armed, false));
        assert_eq!(evaluate(10, AlertState::Armed, 10), (AlertState::Triggered, true));
        assert_eq!(evaluate(20, AlertState::Triggered, 10), (AlertState::Triggered, false));
        assert_eq!(evaluate(0, AlertState::Triggered, 10), (AlertState::Triggered, false));
    }

    #[test]
    fn test_trigger_fires_once() {
        let mut trigger = AlertTrigger::new(10);
        let fired: Vec<bool> = [8, 10, 12, 3, 0, 14, 20]
            .into_iter()
            .map(|score| trigger.evaluate(score))
            .collect();

        assert_eq!(fired.iter().filter(|f| **f).count(), 1);
        assert!(fired[1]);
        assert!(trigger.is_triggered());
    }

    #[test]
    fn test_rearm_allows_new_alert() {
        let mut trigger = AlertTrigger::new(4);
        assert!(trigger.evaluate(4));
        trigger.rearm();
        assert_eq!(trigger.state(), AlertState::Armed);
        assert!(trigger.evaluate(6));
    }
}
