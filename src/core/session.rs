//! The session aggregate.
//!
//! A [`Session`] owns every piece of mutable monitoring state: the distress
//! score, the latching alert, the location sample, the current readings, and
//! the event log. Each `start()` opens a new epoch; inputs tagged with an older
//! epoch, or arriving while the session is stopped, are rejected so nothing
//! from a previous run can leak into the next.

use crate::config::Config;
use crate::core::scorer::{DistressScorer, ScoreUpdate};
use crate::core::snapshot::{DistressLevel, SessionSnapshot};
use crate::core::trigger::{AlertState, AlertTrigger};
use crate::events::{EventKind, EventLog, EventRecord, Severity};
use crate::location::{LocationError, LocationReport, LocationSample};
use crate::notify::{AlertNotification, NotificationSink};
use crate::source::types::{EmotionReading, GestureInfo, Observation, ObservationError};
use crate::source::SourceError;
use std::sync::Arc;
use thiserror::Error;

pub const MSG_STARTED: &str = "Monitoring started";
pub const MSG_STOPPED: &str = "Monitoring stopped";
pub const MSG_ALERT: &str = "SOS ALERT TRIGGERED - Emergency behavior detected!";

/// Identifies one start/stop cycle of a session.
pub type Epoch = u64;

/// Why a session refused an input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("session is not active")]
    Inactive,

    #[error("input from epoch {got} rejected; current epoch is {current}")]
    StaleEpoch { current: Epoch, got: Epoch },

    #[error("malformed observation: {0}")]
    Malformed(#[from] ObservationError),
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub update: ScoreUpdate,
    pub alert_fired: bool,
}

pub struct Session {
    scorer: DistressScorer,
    trigger: AlertTrigger,
    score: u32,
    log: EventLog,
    location: Option<LocationSample>,
    location_resolved: bool,
    current_emotion: Option<EmotionReading>,
    current_gesture: Option<String>,
    active: bool,
    epoch: Epoch,
    source_failing: bool,
    sink: Arc<dyn NotificationSink>,
}

impl Session {
    pub fn new(
        scorer: DistressScorer,
        threshold: u32,
        log_capacity: usize,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            scorer,
            trigger: AlertTrigger::new(threshold),
            score: 0,
            log: EventLog::with_capacity(log_capacity),
            location: None,
            location_resolved: false,
            current_emotion: None,
            current_gesture: None,
            active: false,
            epoch: 0,
            source_failing: false,
            sink,
        }
    }

    pub fn from_config(config: &Config, sink: Arc<dyn NotificationSink>) -> Self {
        Self::new(
            DistressScorer::new(config.max_score, &config.emergency_gestures),
            config.threshold,
            config.log_capacity,
            sink,
        )
    }

    /// Begin a new monitoring run.
    ///
    /// Resets score and alert state, forgets the previous location, and opens
    /// a new epoch. The event log is kept. Returns `None` if already active.
    pub fn start(&mut self) -> Option<Epoch> {
        if self.active {
            return None;
        }

        self.epoch += 1;
        self.active = true;
        self.score = 0;
        self.trigger.rearm();
        self.location = None;
        self.location_resolved = false;
        self.source_failing = false;
        self.record(EventKind::Status, MSG_STARTED, Severity::Info);

        tracing::info!(epoch = self.epoch, threshold = self.trigger.threshold(), "session started");
        Some(self.epoch)
    }

    /// End the current run. Score and alert state stay visible until the next start.
    ///
    /// Returns `false` if the session was not active.
    pub fn stop(&mut self) -> bool {
        if !self.active {
            return false;
        }

        self.active = false;
        self.record(EventKind::Status, MSG_STOPPED, Severity::Info);

        tracing::info!(epoch = self.epoch, score = self.score, "session stopped");
        true
    }

    /// Apply an observation produced for `epoch`.
    pub fn on_observation(
        &mut self,
        epoch: Epoch,
        observation: Observation,
    ) -> Result<TickOutcome, SessionError> {
        self.check_epoch(epoch)?;
        let observation = observation.normalized();
        observation.validate()?;

        self.source_failing = false;
        let update = self.scorer.update(self.score, &observation);
        self.score = update.score;

        if update.increased() {
            let message = distress_message(&observation, update.signals.emotion);
            self.record(EventKind::Emotion, message, Severity::Warning);
        }

        let alert_fired = self.trigger.evaluate(self.score);
        if alert_fired {
            self.record(EventKind::Alert, MSG_ALERT, Severity::Critical);
            let alert = AlertNotification::new(
                LocationReport::from(self.location),
                self.score,
                self.trigger.threshold(),
            );
            tracing::warn!(score = self.score, location = %alert.location, "alert triggered");
            self.sink.notify(&alert);
        }

        tracing::debug!(
            score = self.score,
            emotion = %observation.emotion.label,
            gesture = %observation.gesture,
            "tick"
        );

        self.current_emotion = Some(observation.emotion);
        self.current_gesture = Some(observation.gesture);

        Ok(TickOutcome {
            update,
            alert_fired,
        })
    }

    /// Apply an observation to the current epoch.
    pub fn observe(&mut self, observation: Observation) -> Result<TickOutcome, SessionError> {
        self.on_observation(self.epoch, observation)
    }

    /// Record the outcome of the one-shot location request for `epoch`.
    ///
    /// Only the first result of an epoch counts, whether it succeeded or not;
    /// later results for the same epoch are ignored.
    pub fn on_location(
        &mut self,
        epoch: Epoch,
        result: Result<LocationSample, LocationError>,
    ) -> Result<(), SessionError> {
        self.check_epoch(epoch)?;
        if self.location_resolved {
            return Ok(());
        }
        self.location_resolved = true;

        match result {
            Ok(sample) => {
                self.location = Some(sample);
                self.record(
                    EventKind::Status,
                    format!("Location acquired: {}", sample.display()),
                    Severity::Info,
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "location request failed");
                self.record(EventKind::Status, e.to_string(), Severity::Warning);
            }
        }
        Ok(())
    }

    /// Surface a failing observation source.
    ///
    /// Only the first failure of a streak is logged; the streak ends at the
    /// next accepted observation. Returns whether a record was appended.
    pub fn on_source_error(
        &mut self,
        epoch: Epoch,
        error: &SourceError,
    ) -> Result<bool, SessionError> {
        self.check_epoch(epoch)?;
        if self.source_failing {
            return Ok(false);
        }

        self.source_failing = true;
        self.record(
            EventKind::Status,
            format!("Observation source unavailable: {error}"),
            Severity::Warning,
        );
        Ok(true)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let max_score = self.scorer.max_score();
        let percentage = if max_score == 0 {
            0.0
        } else {
            (self.score as f64 * 100.0 / max_score as f64).min(100.0)
        };

        SessionSnapshot {
            active: self.active,
            distress_score: self.score,
            threshold: self.trigger.threshold(),
            max_score,
            alert_state: self.trigger.state(),
            level: DistressLevel::from_score(self.score),
            percentage,
            approaching_threshold: self.score >= self.trigger.threshold()
                && !self.trigger.is_triggered(),
            current_emotion: self.current_emotion.clone(),
            current_gesture: self.current_gesture.as_deref().map(|g| {
                GestureInfo::classify(g, self.scorer.is_emergency_gesture(g))
            }),
            location: self.location,
            events: self.log.to_vec(),
        }
    }

    /// Current distress score, `0..=max_score`.
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn alert_state(&self) -> AlertState {
        self.trigger.state()
    }

    /// Score at which the alert fires.
    pub fn threshold(&self) -> u32 {
        self.trigger.threshold()
    }

    /// Location acquired during the current run, if any.
    ///
    /// Cleared by [`Session::start`], so it never refers to an earlier run.
    pub fn location(&self) -> Option<LocationSample> {
        self.location
    }

    /// The event log. It survives restarts.
    pub fn events(&self) -> &EventLog {
        &self.log
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Identifier of the latest run; `0` before the first `start`.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    fn check_epoch(&self, epoch: Epoch) -> Result<(), SessionError> {
        if epoch != self.epoch {
            return Err(SessionError::StaleEpoch {
                current: self.epoch,
                got: epoch,
            });
        }
        if !self.active {
            return Err(SessionError::Inactive);
        }
        Ok(())
    }

    fn record(&mut self, kind: EventKind, message: impl Into<String>, severity: Severity) {
        self.log.append(EventRecord::new(kind, message, severity));
    }
}

/// Describe the signal that raised the score.
fn distress_message(observation: &Observation, emotion_flagged: bool) -> String {
    if emotion_flagged {
        format!(
            "Distress signal: {} ({}%)",
            observation.emotion.label,
            observation.emotion.confidence_pct()
        )
    } else {
        format!(
            "Distress signal: {} gesture",
            observation.gesture.to_uppercase()
        )
    }
}
