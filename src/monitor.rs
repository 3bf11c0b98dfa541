//! Session controller runtime.
//!
//! The [`Monitor`] drives a [`Session`] from a tokio ticker at a fixed
//! cadence and resolves the one-shot location request on a separate task.
//!
//! Every tick and the location completion take the session lock and carry the
//! epoch they were spawned for. `stop()` marks the session stopped under that
//! same lock before aborting the tasks, so a tick that was already in flight
//! either finished first or finds the session inactive and appends nothing.
//! The source is only consulted while the session lock is held and the run is
//! still current, so a racing `stop()` never consumes an observation.

use crate::config::Config;
use crate::core::{Epoch, Session, SessionError, SessionSnapshot};
use crate::location::LocationProvider;
use crate::notify::NotificationSink;
use crate::source::{ObservationSource, SourceError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

type SharedSource = Arc<Mutex<Box<dyn ObservationSource>>>;

pub struct Monitor {
    session: Arc<Mutex<Session>>,
    source: SharedSource,
    location: Arc<dyn LocationProvider>,
    tick_interval: Duration,
    updates: Arc<watch::Sender<SessionSnapshot>>,
    ticker: Option<JoinHandle<()>>,
    locator: Option<JoinHandle<()>>,
}

impl Monitor {
    pub fn new(
        config: &Config,
        source: Box<dyn ObservationSource>,
        location: Arc<dyn LocationProvider>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let session = Session::from_config(config, sink);
        let (updates, _) = watch::channel(session.snapshot());

        Self {
            session: Arc::new(Mutex::new(session)),
            source: Arc::new(Mutex::new(source)),
            location,
            tick_interval: config.tick_interval,
            updates: Arc::new(updates),
            ticker: None,
            locator: None,
        }
    }

    /// Start a monitoring run.
    ///
    /// Resets the session, spawns the ticker (first observation one interval
    /// from now), and fires the location request. Returns `None` if a run is
    /// already active.
    pub async fn start(&mut self) -> Option<Epoch> {
        let epoch = {
            let mut session = self.session.lock().await;
            let epoch = session.start()?;
            self.updates.send_replace(session.snapshot());
            epoch
        };

        // Tasks left over from a run that ended on its own
        self.abort_tasks();

        self.ticker = Some(tokio::spawn(run_ticker(
            self.session.clone(),
            self.source.clone(),
            self.updates.clone(),
            epoch,
            self.tick_interval,
        )));
        self.locator = Some(tokio::spawn(run_locator(
            self.session.clone(),
            self.location.clone(),
            self.updates.clone(),
            epoch,
        )));

        Some(epoch)
    }

    /// Stop the current run. No record is appended after this returns.
    ///
    /// Returns `false` if no run was active.
    pub async fn stop(&mut self) -> bool {
        let shared = self.session.clone();
        let mut session = shared.lock().await;
        let stopped = session.stop();
        self.abort_tasks();
        if stopped {
            self.updates.send_replace(session.snapshot());
        }
        stopped
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    pub async fn is_active(&self) -> bool {
        self.session.lock().await.is_active()
    }

    /// Receive a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    fn abort_tasks(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        if let Some(handle) = self.locator.take() {
            handle.abort();
        }
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}

async fn run_ticker(
    session: Arc<Mutex<Session>>,
    source: SharedSource,
    updates: Arc<watch::Sender<SessionSnapshot>>,
    epoch: Epoch,
    period: Duration,
) {
    let mut ticks = time::interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticks.tick().await;

        // Lock order: session, then source. Nothing is pulled for a stopped run.
        let mut guard = session.lock().await;
        if !guard.is_active() || guard.epoch() != epoch {
            break;
        }
        let next = source.lock().await.next_observation();

        match next {
            Ok(observation) => match guard.on_observation(epoch, observation) {
                Ok(outcome) => {
                    if outcome.alert_fired {
                        tracing::info!(epoch, "alert latched for this session");
                    }
                }
                Err(SessionError::Malformed(e)) => {
                    tracing::warn!(error = %e, "rejected malformed observation");
                    continue;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "ticker exiting");
                    break;
                }
            },
            Err(SourceError::Exhausted) => {
                tracing::info!(epoch, "observation source exhausted");
                guard.stop();
                updates.send_replace(guard.snapshot());
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "observation source failed; skipping tick");
                if let Err(e) = guard.on_source_error(epoch, &e) {
                    tracing::debug!(error = %e, "ticker exiting");
                    break;
                }
            }
        }

        updates.send_replace(guard.snapshot());
    }
}

async fn run_locator(
    session: Arc<Mutex<Session>>,
    provider: Arc<dyn LocationProvider>,
    updates: Arc<watch::Sender<SessionSnapshot>>,
    epoch: Epoch,
) {
    let result = provider.locate().await;

    let mut guard = session.lock().await;
    match guard.on_location(epoch, result) {
        Ok(()) => {
            updates.send_replace(guard.snapshot());
        }
        Err(e) => tracing::debug!(error = %e, "discarding location result"),
    }
}
