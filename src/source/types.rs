//! Observation types consumed by the distress scorer.
//!
//! An observation is produced once per tick by an external classifier and is
//! discarded after the tick; only its derived effects are retained.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label used by classifiers when no gesture is visible.
pub const NO_GESTURE: &str = "none";

/// Reasons an observation is rejected before it reaches the scorer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObservationError {
    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),

    #[error("emotion label is empty")]
    EmptyEmotion,

    #[error("gesture label is empty")]
    EmptyGesture,
}

/// An emotion classification with its display confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionReading {
    /// Normalized (lowercase, trimmed) emotion label
    pub label: String,
    /// Classifier confidence in [0, 1]; display only
    pub confidence: f64,
    /// Whether the classifier flags this emotion as distress
    pub is_distress: bool,
}

impl EmotionReading {
    /// Confidence as a whole percentage, e.g. `92` for `0.92`.
    pub fn confidence_pct(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// One (emotion, gesture) classification delivered per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub emotion: EmotionReading,
    pub gesture: String,
}

impl Observation {
    /// Build a validated observation.
    ///
    /// Labels are trimmed and lowercased. Confidence must be finite and in `[0, 1]`.
    pub fn new(
        emotion_label: &str,
        confidence: f64,
        is_distress_emotion: bool,
        gesture_label: &str,
    ) -> Result<Self, ObservationError> {
        let observation = Self {
            emotion: EmotionReading {
                label: emotion_label.to_string(),
                confidence,
                is_distress: is_distress_emotion,
            },
            gesture: gesture_label.to_string(),
        }
        .normalized();
        observation.validate()?;
        Ok(observation)
    }

    /// Trim and lowercase both labels.
    ///
    /// Deserialized observations bypass [`Observation::new`]; every path into
    /// the scorer goes through this so label matching is case-insensitive.
    pub fn normalized(mut self) -> Self {
        self.emotion.label = normalize_label(&self.emotion.label);
        self.gesture = normalize_label(&self.gesture);
        self
    }

    /// Check the invariants a well-formed source guarantees.
    ///
    /// Observations that arrive through deserialization bypass [`Observation::new`],
    /// so the session validates again before scoring.
    pub fn validate(&self) -> Result<(), ObservationError> {
        let confidence = self.emotion.confidence;
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(ObservationError::ConfidenceOutOfRange(confidence));
        }
        if self.emotion.label.trim().is_empty() {
            return Err(ObservationError::EmptyEmotion);
        }
        if self.gesture.trim().is_empty() {
            return Err(ObservationError::EmptyGesture);
        }
        Ok(())
    }
}

/// Canonical form of a classifier label.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Display classification of the current gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum GestureInfo {
    /// No hand gesture visible
    None,
    /// A recognized gesture that does not indicate distress
    Normal(String),
    /// A designated emergency gesture
    Emergency(String),
}

impl GestureInfo {
    pub fn classify(gesture: &str, is_emergency: bool) -> Self {
        if gesture.is_empty() || gesture == NO_GESTURE {
            GestureInfo::None
        } else if is_emergency {
            GestureInfo::Emergency(gesture.to_string())
        } else {
            GestureInfo::Normal(gesture.to_string())
        }
    }

    /// Short human-readable description for badges.
    pub fn description(&self) -> &'static str {
        match self {
            GestureInfo::None => "Monitoring hand movements",
            GestureInfo::Normal(_) => "Normal gesture",
            GestureInfo::Emergency(_) => "SOS gesture detected",
        }
    }

    pub fn is_emergency(&self) -> bool {
        matches!(self, GestureInfo::Emergency(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_normalizes_labels() {
        let obs = Observation::new("  Fear ", 0.92, true, "HELP").unwrap();
        assert_eq!(obs.emotion.label, "fear");
        assert_eq!(obs.gesture, "help");
        assert_eq!(obs.emotion.confidence_pct(), 92);
    }

    #[test]
    fn test_observation_rejects_bad_confidence() {
        assert_eq!(
            Observation::new("happy", 1.5, false, "none"),
            Err(ObservationError::ConfidenceOutOfRange(1.5))
        );
        assert!(Observation::new("happy", -0.1, false, "none").is_err());
        assert!(Observation::new("happy", f64::NAN, false, "none").is_err());
    }

    #[test]
    fn test_observation_rejects_empty_labels() {
        assert_eq!(
            Observation::new(" ", 0.5, false, "none"),
            Err(ObservationError::EmptyEmotion)
        );
        assert_eq!(
            Observation::new("sad", 0.5, false, ""),
            Err(ObservationError::EmptyGesture)
        );
    }

    #[test]
    fn test_normalized_fixes_deserialized_labels() {
        let raw: Observation = serde_json::from_str(
            r#"{"emotion":{"label":" FEAR","confidence":0.9,"is_distress":true},"gesture":"Help "}"#,
        )
        .unwrap();
        let obs = raw.normalized();
        assert_eq!(obs.emotion.label, "fear");
        assert_eq!(obs.gesture, "help");
    }

    #[test]
    fn test_gesture_info_classification() {
        assert_eq!(GestureInfo::classify("none", false), GestureInfo::None);
        assert_eq!(
            GestureInfo::classify("wave", false),
            GestureInfo::Normal("wave".to_string())
        );
        let sos = GestureInfo::classify("help", true);
        assert!(sos.is_emergency());
        assert_eq!(sos.description(), "SOS gesture detected");
    }
}
