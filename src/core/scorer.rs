//! Distress scoring.
//!
//! The score is an asymmetric leaky integrator: any distress signal raises it
//! by [`ESCALATION_STEP`], anything else lets it decay by [`DECAY_STEP`].
//! The result is always clamped to `[0, max_score]`.

use crate::source::types::{normalize_label, Observation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Upper bound of the distress score.
pub const MAX_SCORE: u32 = 20;

/// Score increase for a tick carrying any distress signal.
pub const ESCALATION_STEP: u32 = 2;

/// Score decrease for a calm tick.
pub const DECAY_STEP: u32 = 1;

/// Gestures treated as emergency signals when none are configured.
pub const DEFAULT_EMERGENCY_GESTURES: [&str; 2] = ["help", "stop"];

/// Which signals fired on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistressSignals {
    pub emotion: bool,
    pub gesture: bool,
}

impl DistressSignals {
    /// Signals combine by disjunction, never by count.
    pub fn any(&self) -> bool {
        self.emotion || self.gesture
    }
}

/// Result of applying one observation to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub previous: u32,
    pub score: u32,
    pub signals: DistressSignals,
}

impl ScoreUpdate {
    pub fn increased(&self) -> bool {
        self.score > self.previous
    }
}

/// Converts observations into clamped score updates.
#[derive(Debug, Clone)]
pub struct DistressScorer {
    max_score: u32,
    emergency_gestures: BTreeSet<String>,
}

impl DistressScorer {
    pub fn new<I, S>(max_score: u32, emergency_gestures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            max_score,
            emergency_gestures: emergency_gestures
                .into_iter()
                .map(|g| normalize_label(g.as_ref()))
                .collect(),
        }
    }

    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    /// Whether `gesture` is a configured emergency gesture, ignoring case
    /// and surrounding whitespace.
    pub fn is_emergency_gesture(&self, gesture: &str) -> bool {
        self.emergency_gestures.contains(&normalize_label(gesture))
    }

    pub fn signals(&self, observation: &Observation) -> DistressSignals {
        DistressSignals {
            emotion: observation.emotion.is_distress,
            gesture: self.is_emergency_gesture(&observation.gesture),
        }
    }

    /// Apply one observation to `previous`.
    ///
    /// Confidence is ignored; only the distress flags matter.
    pub fn update(&self, previous: u32, observation: &Observation) -> ScoreUpdate {
        let signals = self.signals(observation);
        let previous = previous.min(self.max_score);
        let score = if signals.any() {
            previous.saturating_add(ESCALATION_STEP).min(self.max_score)
        } else {
            previous.saturating_sub(DECAY_STEP)
        };

        ScoreUpdate {
            previous,
            score,
            signals,
        }
    }
}

impl Default for DistressScorer {
    fn default() -> Self {
        Self::new(MAX_SCORE, DEFAULT_EMERGENCY_GESTURES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(is_distress: bool, gesture: &str) -> Observation {
        Observation::new("neutral", 0.5, is_distress, gesture).unwrap()
    }

    #[test]
    fn test_distress_escalates_and_clamps() {
        let scorer = DistressScorer::default();
        assert_eq!(scorer.update(0, &obs(true, "none")).score, 2);
        assert_eq!(scorer.update(19, &obs(true, "none")).score, 20);
        assert_eq!(scorer.update(20, &obs(true, "none")).score, 20);
    }

    #[test]
    fn test_calm_decays_and_clamps() {
        let scorer = DistressScorer::default();
        assert_eq!(scorer.update(5, &obs(false, "wave")).score, 4);
        assert_eq!(scorer.update(0, &obs(false, "none")).score, 0);
    }

    #[test]
    fn test_emergency_gesture_alone_escalates() {
        let scorer = DistressScorer::default();
        let update = scorer.update(3, &obs(false, "help"));
        assert_eq!(update.score, 5);
        assert!(update.signals.gesture);
        assert!(!update.signals.emotion);
    }

    #[test]
    fn test_combined_signals_are_not_additive() {
        let scorer = DistressScorer::default();
        let update = scorer.update(4, &obs(true, "stop"));
        assert_eq!(update.score, 6);
        assert!(update.signals.emotion && update.signals.gesture);
    }

    #[test]
    fn test_confidence_does_not_affect_delta() {
        let scorer = DistressScorer::default();
        let low = Observation::new("fear", 0.01, true, "none").unwrap();
        let high = Observation::new("fear", 1.0, true, "none").unwrap();
        assert_eq!(scorer.update(6, &low).score, scorer.update(6, &high).score);
    }

    #[test]
    fn test_configured_gestures_are_normalized() {
        let scorer = DistressScorer::new(MAX_SCORE, [" SOS "]);
        assert!(scorer.is_emergency_gesture("sos"));
        assert!(scorer.is_emergency_gesture(" SoS"));
        assert!(!scorer.is_emergency_gesture("help"));
    }

    #[test]
    fn test_clamping_law_over_long_runs() {
        let scorer = DistressScorer::default();
        let mut score = 0;
        for i in 0..200u32 {
            // Pseudo-random but deterministic pattern of signals
            let distress = (i * 7 + i / 3) % 5 < 2;
            let update = scorer.update(score, &obs(distress, "none"));
            assert_eq!(update.increased(), distress && score < MAX_SCORE);
            score = update.score;
            assert!(score <= MAX_SCORE);
        }
    }

    #[test]
    fn test_runs_follow_closed_form() {
        let scorer = DistressScorer::default();
        for start in 0..=MAX_SCORE {
            for n in 0..25u32 {
                let mut up = start;
                let mut down = start;
                for _ in 0..n {
                    up = scorer.update(up, &obs(true, "none")).score;
                    down = scorer.update(down, &obs(false, "none")).score;
                }
                assert_eq!(up, (start + 2 * n).min(MAX_SCORE));
                assert_eq!(down, start.saturating_sub(n));
            }
        }
    }
}
