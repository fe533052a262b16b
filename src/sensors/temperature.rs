//! SoC temperature from the Linux thermal framework.
//!
//! The kernel exposes each thermal zone as a text file containing the
//! temperature in millidegrees Celsius (e.g. `48312\n`).  The file is
//! re-read on every call; no caching.
//!
//! Readings outside [`MIN_PLAUSIBLE_C`, `MAX_PLAUSIBLE_C`] are rejected
//! as a transient [`SensorError::OutOfRange`] rather than fed to the
//! controller.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::app::ports::SensorPort;
use crate::error::{ConfigError, SensorError};

pub const MIN_PLAUSIBLE_C: f32 = -40.0;
pub const MAX_PLAUSIBLE_C: f32 = 150.0;

pub struct CpuTemperatureSensor {
    path: PathBuf,
}

impl CpuTemperatureSensor {
    /// Open a thermal zone.  The file must be readable now.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        fs::read_to_string(&path).map_err(|_| ConfigError::SensorUnresolvable)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn millidegrees_to_celsius(raw: &str) -> Result<f32, SensorError> {
        let milli: i64 = raw.trim().parse().map_err(|_| SensorError::Unparseable)?;
        let celsius = milli as f32 / 1000.0;
        if !(MIN_PLAUSIBLE_C..=MAX_PLAUSIBLE_C).contains(&celsius) {
            return Err(SensorError::OutOfRange);
        }
        Ok(celsius)
    }
}

impl SensorPort for CpuTemperatureSensor {
    fn read(&mut self) -> Result<f32, SensorError> {
        let raw = fs::read_to_string(&self.path).map_err(|_| SensorError::ReadFailed)?;
        let celsius = Self::millidegrees_to_celsius(&raw)?;
        debug!("thermal: {} -> {:.1} C", self.path.display(), celsius);
        Ok(celsius)
    }
}
