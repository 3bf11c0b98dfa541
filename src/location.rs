//! One-shot location capability.
//!
//! A session asks for the subject's location once at start. The answer is
//! used only to enrich the alert notification; failure never affects scoring.

use serde::{Deserialize, Serialize};
use std::future::{ready, Future};
use std::pin::Pin;
use thiserror::Error;

/// A geographic fix in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub lat: f64,
    pub lon: f64,
}

impl LocationSample {
    /// Build a sample, rejecting coordinates outside the WGS84 range.
    pub fn new(lat: f64, lon: f64) -> Result<Self, LocationError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(LocationError::Unavailable(format!(
                "invalid coordinates {lat}, {lon}"
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Coordinates rounded to 4 decimal places, e.g. `48.8584, 2.2945`.
    pub fn display(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Why a location could not be acquired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location access denied")]
    Denied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),

    #[error("Location not supported on this device")]
    Unsupported,
}

/// Best-known location attached to an alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocationReport {
    Known(LocationSample),
    Unavailable,
}

impl From<Option<LocationSample>> for LocationReport {
    fn from(sample: Option<LocationSample>) -> Self {
        match sample {
            Some(sample) => LocationReport::Known(sample),
            None => LocationReport::Unavailable,
        }
    }
}

impl std::fmt::Display for LocationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationReport::Known(sample) => write!(f, "Location: {}", sample.display()),
            LocationReport::Unavailable => write!(f, "Location unavailable"),
        }
    }
}

/// Future returned by a [`LocationProvider`].
pub type LocateFuture = Pin<Box<dyn Future<Output = Result<LocationSample, LocationError>> + Send>>;

/// A capability that resolves the current location once.
///
/// The request runs on its own task and never delays the tick cadence.
/// There is no retry or timeout; the future resolves or fails once.
pub trait LocationProvider: Send + Sync {
    fn locate(&self) -> LocateFuture;
}

impl<F> LocationProvider for F
where
    F: Fn() -> Result<LocationSample, LocationError> + Send + Sync,
{
    fn locate(&self) -> LocateFuture {
        Box::pin(ready(self()))
    }
}

/// Always reports the same configured position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub LocationSample);

impl LocationProvider for FixedLocation {
    fn locate(&self) -> LocateFuture {
        Box::pin(ready(Ok(self.0)))
    }
}

/// A device without positioning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    fn locate(&self) -> LocateFuture {
        Box::pin(ready(Err(LocationError::Unsupported)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_display_rounds_to_four_places() {
        let sample = LocationSample::new(48.858_370_1, 2.294_481_3).unwrap();
        assert_eq!(sample.display(), "48.8584, 2.2945");
    }

    #[test]
    fn test_sample_rejects_out_of_range() {
        assert!(LocationSample::new(91.0, 0.0).is_err());
        assert!(LocationSample::new(0.0, -180.5).is_err());
    }

    #[test]
    fn test_report_display() {
        let known = LocationReport::from(Some(LocationSample { lat: 1.0, lon: 2.0 }));
        assert_eq!(known.to_string(), "Location: 1.0000, 2.0000");
        assert_eq!(LocationReport::from(None).to_string(), "Location unavailable");
    }

    #[tokio::test]
    async fn test_providers() {
        let fixed = FixedLocation(LocationSample { lat: 10.0, lon: 20.0 });
        assert_eq!(fixed.locate().await.unwrap().lat, 10.0);
        assert_eq!(NoLocation.locate().await, Err(LocationError::Unsupported));

        let denied = || -> Result<LocationSample, LocationError> { Err(LocationError::Denied) };
        assert_eq!(denied.locate().await, Err(LocationError::Denied));
    }
}
