//! Controller configuration parameters.
//!
//! All tunable parameters for the fan controller.  Values come from
//! defaults, an optional JSON file, and CLI flags (in that order of
//! precedence, lowest first).  Everything is immutable once the control
//! loop has been constructed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::control::hysteresis::Thresholds;
use crate::error::ConfigError;
use crate::pins;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Actuator ---
    /// GPIO line driving the fan
    pub gpio_pin: u32,
    /// Drive the line LOW for "on" (inverting transistor stage)
    pub active_low: bool,
    /// Root of the sysfs GPIO tree
    pub gpio_root: PathBuf,

    // --- Thresholds ---
    /// Temperature (Celsius) above which the fan engages
    pub on_threshold_c: f32,
    /// Temperature (Celsius) below which the fan disengages
    pub off_threshold_c: f32,

    // --- Sensor ---
    /// Thermal zone file reporting millidegrees Celsius
    pub thermal_zone: PathBuf,

    // --- Timing ---
    /// Seconds between sensor polls
    pub poll_interval_secs: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            gpio_pin: pins::FAN_GPIO,
            active_low: false,
            gpio_root: PathBuf::from(pins::SYSFS_GPIO_ROOT),

            on_threshold_c: 65.0,
            off_threshold_c: 55.0,

            thermal_zone: PathBuf::from(pins::CPU_THERMAL_ZONE),

            poll_interval_secs: 5.0,
        }
    }
}

impl ControllerConfig {
    /// Reject invalid values instead of clamping them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds()?;
        self.poll_interval()?;
        Ok(())
    }

    /// The validated threshold pair.
    pub fn thresholds(&self) -> Result<Thresholds, ConfigError> {
        Thresholds::new(self.on_threshold_c, self.off_threshold_c)
    }

    /// The validated poll interval.
    pub fn poll_interval(&self) -> Result<Duration, ConfigError> {
        let secs = self.poll_interval_secs;
        if !secs.is_finite() || secs <= 0.0 {
            return Err(ConfigError::NonPositivePollInterval);
        }
        match Duration::try_from_secs_f32(secs) {
            Ok(d) if !d.is_zero() => Ok(d),
            _ => Err(ConfigError::NonPositivePollInterval),
        }
    }

    /// Load a JSON config file.  Missing fields fall back to defaults.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let cfg = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(cfg)
    }
}
