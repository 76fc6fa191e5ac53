//! System configuration parameters
//!
//! All tunable parameters for the monitor.  The device build uses the
//! compiled-in defaults; the host simulator can override them from a JSON
//! file.

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::link::codec::ParseMode;
use crate::sensors::sim::SimProfile;

/// Core monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // --- Sampling ---
    /// Sample/report interval (milliseconds)
    pub sample_interval_ms: u32,
    /// Volume of liquid represented by one sensor pulse (mL)
    pub ml_per_pulse: f32,

    // --- Tank ---
    /// Volume assumed at power-on and restored by `RST` (mL)
    pub initial_volume_ml: f32,

    // --- Link ---
    /// Longest wait for the transport to acknowledge a telemetry line (milliseconds)
    pub ack_timeout_ms: u32,
    /// Reject malformed refill amounts instead of treating them as 0 mL
    pub strict_command_parsing: bool,

    // --- Simulation ---
    /// Synthetic pulse source used by the host simulator
    pub simulation: SimProfile,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            // Sampling
            sample_interval_ms: 1000, // 1 Hz
            ml_per_pulse: 0.135,

            // Tank
            initial_volume_ml: 200.0,

            // Link
            ack_timeout_ms: 250,
            strict_command_parsing: false,

            simulation: SimProfile::default(),
        }
    }
}

impl MonitorConfig {
    /// Reject values the sampler cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("sample_interval_ms must be > 0"));
        }
        if !(self.ml_per_pulse.is_finite() && self.ml_per_pulse > 0.0) {
            return Err(ConfigError::ValidationFailed("ml_per_pulse must be finite and > 0"));
        }
        if !(self.initial_volume_ml.is_finite() && self.initial_volume_ml >= 0.0) {
            return Err(ConfigError::ValidationFailed(
                "initial_volume_ml must be finite and >= 0",
            ));
        }
        if self.ack_timeout_ms >= self.sample_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "ack_timeout_ms must be shorter than sample_interval_ms",
            ));
        }
        if self.simulation.period_ms == 0 {
            return Err(ConfigError::ValidationFailed("simulation.period_ms must be > 0"));
        }
        Ok(())
    }

    /// Inbound command parsing mode selected by `strict_command_parsing`.
    pub fn parse_mode(&self) -> ParseMode {
        if self.strict_command_parsing {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }

    /// Parse and validate a JSON document.  Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::Unreadable)?;
        Self::from_json(&text)
    }

    /// Load from `path` if given, falling back to defaults on any failure.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("Config: no file given, using defaults");
            return Self::default();
        };
        match Self::load_from_path(path) {
            Ok(config) => {
                info!("Config loaded from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Config load from {} failed ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
