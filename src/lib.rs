//! SOS Sentinel - distress scoring and one-shot emergency alerting.
//!
//! This library consumes a stream of (emotion, gesture) classifications for a
//! monitored subject, maintains a bounded decaying distress score, and fires a
//! single latching alert when the score reaches a threshold.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SOS Sentinel                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │ Observation │──▶│   Distress  │──▶│    Alert    │──▶ sink│
//! │  │   Source    │   │   Scorer    │   │   Trigger   │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │         ▲                 │                 │              │
//! │   (2s ticker)             ▼                 ▼              │
//! │  ┌─────────────┐   ┌─────────────────────────────┐         │
//! │  │  Location   │──▶│   Session  +  Event Log     │──▶ view │
//! │  │  (one-shot) │   │   (newest 50 records)       │         │
//! │  └─────────────┘   └─────────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use sos_sentinel::{ChannelSink, Config, Observation, Session};
//! use std::sync::Arc;
//!
//! let (sink, alerts) = ChannelSink::channel();
//! let mut session = Session::from_config(&Config::default(), Arc::new(sink));
//! session.start();
//!
//! for _ in 0..5 {
//!     let obs = Observation::new("fear", 0.92, true, "none").unwrap();
//!     session.observe(obs).unwrap();
//! }
//!
//! assert_eq!(session.score(), 10);
//! assert_eq!(alerts.try_iter().count(), 1);
//! ```

pub mod config;
pub mod core;
pub mod events;
pub mod location;
pub mod monitor;
pub mod notify;
pub mod source;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use crate::core::{
    AlertState, AlertTrigger, DistressLevel, DistressScorer, Epoch, Session, SessionError,
    SessionSnapshot, TickOutcome,
};
pub use events::{EventKind, EventLog, EventRecord, Severity};
pub use location::{
    FixedLocation, LocateFuture, LocationError, LocationProvider, LocationReport, LocationSample,
    NoLocation,
};
pub use monitor::Monitor;
pub use notify::{AlertNotification, ChannelSink, NotificationSink, TracingSink};
pub use source::{
    GestureInfo, MockSource, Observation, ObservationError, ObservationSource, ReplaySource,
    SourceError,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Notice shown before monitoring begins.
pub const MONITORING_NOTICE: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║                 SOS SENTINEL - MONITORING NOTICE                 ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  This tool watches emotion and hand-gesture classifications      ║
║  and raises ONE emergency alert per session when distress        ║
║  signals persist.                                                ║
║                                                                  ║
║  ✓ WHAT IS KEPT:                                                 ║
║    • A distress score between 0 and 20                           ║
║    • The 50 most recent events of this process                   ║
║    • One location fix per session, if available                 ║
║                                                                  ║
║  ✗ WHAT IS NEVER KEPT:                                           ║
║    • Camera frames or raw classifier output                      ║
║    • Anything across restarts of the program                     ║
║                                                                  ║
║  Alerts are delivered locally. Nothing is sent over a network.   ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitoring_notice_contents() {
        assert!(MONITORING_NOTICE.contains("MONITORING NOTICE"));
        assert!(MONITORING_NOTICE.contains("NEVER KEPT"));
        assert!(MONITORING_NOTICE.contains("ONE emergency alert"));
    }
}
