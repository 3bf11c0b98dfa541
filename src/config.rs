//! Configuration for the SOS Sentinel.

use crate::core::{DEFAULT_EMERGENCY_GESTURES, DEFAULT_THRESHOLD, MAX_SCORE};
use crate::events::DEFAULT_LOG_CAPACITY;
use crate::location::LocationSample;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration for the sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interval between observations while monitoring
    #[serde(rename = "tick_interval_ms", with = "duration_millis")]
    pub tick_interval: Duration,

    /// Score at which the alert latches
    pub threshold: u32,

    /// Upper bound of the distress score
    pub max_score: u32,

    /// Gesture labels that count as distress on their own
    pub emergency_gestures: Vec<String>,

    /// Number of event records retained
    pub log_capacity: usize,

    /// Fixed position reported by the location capability, if any
    pub location: Option<LocationSample>,

    /// Directory for exported session transcripts
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sos-sentinel");

        Self {
            tick_interval: Duration::from_secs(2),
            threshold: DEFAULT_THRESHOLD,
            max_score: MAX_SCORE,
            emergency_gestures: DEFAULT_EMERGENCY_GESTURES
                .iter()
                .map(|g| g.to_string())
                .collect(),
            log_capacity: DEFAULT_LOG_CAPACITY,
            location: None,
            data_path: data_dir,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from JSON text.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sos-sentinel")
            .join("config.json")
    }

    /// Check that the scoring parameters are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_score != MAX_SCORE {
            return Err(ConfigError::Invalid(format!(
                "max_score is fixed at {MAX_SCORE}, got {}",
                self.max_score
            )));
        }
        if self.threshold == 0 || self.threshold > self.max_score {
            return Err(ConfigError::Invalid(format!(
                "threshold must be in 1..={}, got {}",
                self.max_score, self.threshold
            )));
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::Invalid("log_capacity must be positive".into()));
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::Invalid("tick interval must be non-zero".into()));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Serde support for Duration as whole milliseconds.
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
