//! Random mock classifier.
//!
//! Picks uniformly from a small fixed table of emotions and gestures, the same
//! stand-in a UI demo uses before a real model is wired up.

use crate::source::types::{EmotionReading, Observation};
use crate::source::{ObservationSource, SourceError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// (label, confidence, is_distress)
const MOCK_EMOTIONS: [(&str, f64, bool); 4] = [
    ("happy", 0.85, false),
    ("neutral", 0.75, false),
    ("fear", 0.92, true),
    ("sad", 0.68, false),
];

const MOCK_GESTURES: [&str; 4] = ["none", "wave", "help", "stop"];

/// A source that emits random observations from a fixed table.
pub struct MockSource {
    rng: StdRng,
}

impl MockSource {
    /// Create a mock source seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a reproducible mock source.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservationSource for MockSource {
    fn next_observation(&mut self) -> Result<Observation, SourceError> {
        let (label, confidence, is_distress) =
            MOCK_EMOTIONS[self.rng.gen_range(0..MOCK_EMOTIONS.len())];
        let gesture = MOCK_GESTURES[self.rng.gen_range(0..MOCK_GESTURES.len())];

        Ok(Observation {
            emotion: EmotionReading {
                label: label.to_string(),
                confidence,
                is_distress,
            },
            gesture: gesture.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source_draws_from_table() {
        let mut source = MockSource::with_seed(7);
        for _ in 0..100 {
            let obs = source.next_observation().unwrap();
            assert!(MOCK_EMOTIONS.iter().any(|(l, _, _)| *l == obs.emotion.label));
            assert!(MOCK_GESTURES.contains(&obs.gesture.as_str()));
            assert_eq!(obs.emotion.is_distress, obs.emotion.label == "fear");
        }
    }

    #[test]
    fn test_mock_table_entries_are_valid() {
        for (label, confidence, is_distress) in MOCK_EMOTIONS {
            for gesture in MOCK_GESTURES {
                let obs = Observation {
                    emotion: EmotionReading {
                        label: label.to_string(),
                        confidence,
                        is_distress,
                    },
                    gesture: gesture.to_string(),
                };
                assert_eq!(obs.validate(), Ok(()));
                assert_eq!(obs.clone().normalized(), obs);
            }
        }
    }

    #[test]
    fn test_mock_source_seed_is_reproducible() {
        let mut a = MockSource::with_seed(42);
        let mut b = MockSource::with_seed(42);
        for _ in 0..20 {
            assert_eq!(a.next_observation().unwrap(), b.next_observation().unwrap());
        }
    }
}
