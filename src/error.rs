//! Unified error types for the fan controller.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform.  All variants are `Copy` so they
//! can be passed through the controller and event sink without allocation.
//!
//! | Category     | Severity  | Handling                                  |
//! |--------------|-----------|-------------------------------------------|
//! | `Config`     | fatal     | aborts before the loop enters `Running`   |
//! | `Sensor`     | transient | tick skipped, logged, loop continues      |
//! | `Actuator`   | transient | tracked state kept, retried next tick     |

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The sensor could not be read or returned implausible data.
    Sensor(SensorError),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The underlying device node could not be read.
    ReadFailed,
    /// The device returned something that is not a number.
    Unparseable,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read failed"),
            Self::Unparseable => write!(f, "unparseable reading"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl std::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO value write failed.
    GpioWriteFailed,
    /// The output line disappeared (unexported underneath us).
    LineUnavailable,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::LineUnavailable => write!(f, "GPIO line unavailable"),
        }
    }
}

impl std::error::Error for ActuatorError {}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Construction-time configuration errors.  Always fatal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// `on_threshold` must be strictly greater than `off_threshold`.
    ThresholdsInverted { on: f32, off: f32 },
    /// A threshold is NaN or infinite.
    NonFiniteThreshold,
    /// Poll interval must be a positive duration.
    NonPositivePollInterval,
    /// The actuator GPIO line could not be exported or configured.
    ActuatorUnresolvable(u32),
    /// The sensor device node does not exist or cannot be opened.
    SensorUnresolvable,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThresholdsInverted { on, off } => write!(
                f,
                "on threshold ({on}) must be greater than off threshold ({off})"
            ),
            Self::NonFiniteThreshold => write!(f, "thresholds must be finite numbers"),
            Self::NonPositivePollInterval => write!(f, "poll interval must be positive"),
            Self::ActuatorUnresolvable(pin) => write!(f, "GPIO {pin} could not be configured as output"),
            Self::SensorUnresolvable => write!(f, "thermal zone is not readable"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
