//! Output pin on the Linux sysfs GPIO interface.
//!
//! ```text
//!   /sys/class/gpio/export          ← "17"
//!   /sys/class/gpio/gpio17/direction ← "low" | "high"   (output + initial level)
//!   /sys/class/gpio/gpio17/value     ← "0" | "1"
//! ```
//!
//! Implements [`embedded_hal::digital::OutputPin`] so the fan driver
//! stays generic over the pin backend.  Export and direction setup happen
//! once at construction; failure there is a configuration error, while a
//! failed value write later is a transient actuator error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use embedded_hal::digital::{ErrorType, OutputPin, PinState};
use log::{debug, info, warn};

use crate::error::{ActuatorError, ConfigError};

/// udev may take a moment to create the line directory and fix its
/// permissions after export.
const EXPORT_SETTLE_ATTEMPTS: u32 = 10;
const EXPORT_SETTLE_DELAY: Duration = Duration::from_millis(20);

pub struct SysfsOutputPin {
    pin: u32,
    value_path: PathBuf,
}

impl SysfsOutputPin {
    /// Export `pin` under `root` (normally `/sys/class/gpio`) and
    /// configure it as an output already driven to `initial`.
    ///
    /// Pass the actuator's off level here so the line never glitches on
    /// between claim and the first command.
    pub fn export(root: impl AsRef<Path>, pin: u32, initial: PinState) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        let line = root.join(format!("gpio{pin}"));

        if !line.exists() {
            fs::write(root.join("export"), pin.to_string()).map_err(|e| {
                warn!("gpio: export of {} failed: {}", pin, e);
                ConfigError::ActuatorUnresolvable(pin)
            })?;
            debug!("gpio: exported {}", pin);
        }

        let direction = line.join("direction");
        let mode = match initial {
            PinState::High => "high",
            PinState::Low => "low",
        };
        let mut attempt = 0;
        loop {
            match fs::write(&direction, mode) {
                Ok(()) => break,
                Err(e) if attempt + 1 < EXPORT_SETTLE_ATTEMPTS => {
                    debug!("gpio: direction for {} not ready ({}), retrying", pin, e);
                    attempt += 1;
                    thread::sleep(EXPORT_SETTLE_DELAY);
                }
                Err(e) => {
                    warn!("gpio: cannot set {} as output: {}", pin, e);
                    return Err(ConfigError::ActuatorUnresolvable(pin));
                }
            }
        }

        let mut out = Self {
            pin,
            value_path: line.join("value"),
        };
        out.write_value(initial == PinState::High)
            .map_err(|_| ConfigError::ActuatorUnresolvable(pin))?;

        info!("gpio: line {} configured as output ({})", pin, mode);
        Ok(out)
    }

    pub fn pin(&self) -> u32 {
        self.pin
    }

    fn write_value(&mut self, high: bool) -> Result<(), ActuatorError> {
        let v: &[u8] = if high { b"1" } else { b"0" };
        fs::write(&self.value_path, v).map_err(|e| {
            warn!("gpio: write to {} failed: {}", self.pin, e);
            match e.kind() {
                io::ErrorKind::NotFound => ActuatorError::LineUnavailable,
                _ => ActuatorError::GpioWriteFailed,
            }
        })
    }
}

impl embedded_hal::digital::Error for ActuatorError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl ErrorType for SysfsOutputPin {
    type Error = ActuatorError;
}

impl OutputPin for SysfsOutputPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write_value(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write_value(true)
    }
}
