//! Read-only view of a session for the rendering layer.

use crate::core::trigger::AlertState;
use crate::events::EventRecord;
use crate::location::LocationSample;
use crate::source::types::{EmotionReading, GestureInfo};
use serde::{Deserialize, Serialize};

/// Width of the text gauge in characters.
const GAUGE_WIDTH: usize = 20;

/// Coarse band of the distress score for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistressLevel {
    Low,
    Medium,
    High,
}

impl DistressLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=4 => DistressLevel::Low,
            5..=9 => DistressLevel::Medium,
            _ => DistressLevel::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistressLevel::Low => "low",
            DistressLevel::Medium => "medium",
            DistressLevel::High => "high",
        }
    }
}

/// Everything a gauge, badge set, and scrollable log need to draw a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub active: bool,
    pub distress_score: u32,
    pub threshold: u32,
    pub max_score: u32,
    pub alert_state: AlertState,
    pub level: DistressLevel,
    /// Score as a percentage of `max_score`
    pub percentage: f64,
    /// Score is at or above threshold but the alert has not latched
    pub approaching_threshold: bool,
    pub current_emotion: Option<EmotionReading>,
    pub current_gesture: Option<GestureInfo>,
    pub location: Option<LocationSample>,
    /// Newest first
    pub events: Vec<EventRecord>,
}

impl SessionSnapshot {
    pub fn is_alert_triggered(&self) -> bool {
        self.alert_state == AlertState::Triggered
    }

    /// One-line text gauge, e.g. `[##########----------] 10/20 ALERT TRIGGERED`.
    pub fn gauge_line(&self) -> String {
        let filled = if self.max_score == 0 {
            0
        } else {
            (self.distress_score as usize * GAUGE_WIDTH / self.max_score as usize)
                .min(GAUGE_WIDTH)
        };
        let status = if self.is_alert_triggered() {
            "ALERT TRIGGERED".to_string()
        } else {
            self.level.as_str().to_uppercase()
        };

        format!(
            "[{}{}] {}/{} {} (threshold {})",
            "#".repeat(filled),
            "-".repeat(GAUGE_WIDTH - filled),
            self.distress_score,
            self.max_score,
            status,
            self.threshold
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(score: u32, alert_state: AlertState) -> SessionSnapshot {
        SessionSnapshot {
            active: true,
            distress_score: score,
            threshold: 10,
            max_score: 20,
            alert_state,
            level: DistressLevel::from_score(score),
            percentage: score as f64 / 20.0 * 100.0,
            approaching_threshold: false,
            current_emotion: None,
            current_gesture: None,
            location: None,
            events: Vec::new(),
        }
    }

    #[test]
    fn test_level_bands() {
        assert_eq!(DistressLevel::from_score(0), DistressLevel::Low);
        assert_eq!(DistressLevel::from_score(4), DistressLevel::Low);
        assert_eq!(DistressLevel::from_score(5), DistressLevel::Medium);
        assert_eq!(DistressLevel::from_score(9), DistressLevel::Medium);
        assert_eq!(DistressLevel::from_score(10), DistressLevel::High);
    }

    #[test]
    fn test_gauge_line() {
        assert_eq!(
            snapshot(5, AlertState::Armed).gauge_line(),
            "[#####---------------] 5/20 MEDIUM (threshold 10)"
        );
        assert_eq!(
            snapshot(20, AlertState::Triggered).gauge_line(),
            "[####################] 20/20 ALERT TRIGGERED (threshold 10)"
        );
    }
}
