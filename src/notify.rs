//! Out-of-band alert notification.
//!
//! Fired exactly once per session, on the ARMED to TRIGGERED transition.

use crate::location::LocationReport;
use chrono::{DateTime, Utc};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

pub const ALERT_TITLE: &str = "Emergency Alert Triggered!";

/// Payload delivered to the notification sink when the alert latches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertNotification {
    pub title: String,
    /// Human-readable location line, e.g. `Location unavailable`
    pub description: String,
    pub location: LocationReport,
    pub score: u32,
    pub threshold: u32,
    pub triggered_at: DateTime<Utc>,
}

impl AlertNotification {
    pub fn new(location: LocationReport, score: u32, threshold: u32) -> Self {
        Self {
            title: ALERT_TITLE.to_string(),
            description: location.to_string(),
            location,
            score,
            threshold,
            triggered_at: Utc::now(),
        }
    }
}

/// Receives alert notifications.
///
/// Called while the session is locked, so implementations must not block.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, alert: &AlertNotification);
}

/// Writes alerts to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, alert: &AlertNotification) {
        tracing::error!(
            score = alert.score,
            threshold = alert.threshold,
            "{}: {}",
            alert.title,
            alert.description
        );
    }
}

/// Forwards alerts over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<AlertNotification>,
}

impl ChannelSink {
    /// Create a sink and the receiver that observes it.
    pub fn channel() -> (Self, Receiver<AlertNotification>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, alert: &AlertNotification) {
        if self.sender.send(alert.clone()).is_err() {
            tracing::warn!("alert receiver dropped; notification not delivered");
        }
    }
}

/// Delivers to both sinks, first then second.
impl<A, B> NotificationSink for (A, B)
where
    A: NotificationSink,
    B: NotificationSink,
{
    fn notify(&self, alert: &AlertNotification) {
        self.0.notify(alert);
        self.1.notify(alert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationSample;

    #[test]
    fn test_notification_description() {
        let alert = AlertNotification::new(LocationReport::Unavailable, 10, 10);
        assert_eq!(alert.title, ALERT_TITLE);
        assert_eq!(alert.description, "Location unavailable");

        let sample = LocationSample { lat: -33.86789, lon: 151.20732 };
        let alert = AlertNotification::new(LocationReport::Known(sample), 12, 10);
        assert_eq!(alert.description, "Location: -33.8679, 151.2073");
    }

    #[test]
    fn test_channel_sink_delivers() {
        let (sink, receiver) = ChannelSink::channel();
        sink.notify(&AlertNotification::new(LocationReport::Unavailable, 10, 10));

        let alert = receiver.try_recv().unwrap();
        assert_eq!(alert.score, 10);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_paired_sinks_both_receive() {
        let (first, first_rx) = ChannelSink::channel();
        let (second, second_rx) = ChannelSink::channel();
        let pair = (first, second);
        pair.notify(&AlertNotification::new(LocationReport::Unavailable, 14, 10));

        assert_eq!(first_rx.try_recv().unwrap().score, 14);
        assert_eq!(second_rx.try_recv().unwrap().score, 14);
    }

    #[test]
    fn test_tracing_sink_alongside_channel() {
        let (channel, receiver) = ChannelSink::channel();
        let sink: std::sync::Arc<dyn NotificationSink> =
            std::sync::Arc::new((TracingSink, channel));
        sink.notify(&AlertNotification::new(LocationReport::Unavailable, 10, 10));

        assert_eq!(receiver.try_iter().count(), 1);
    }
}
