//! Two-threshold (hysteresis) on/off controller
//!
//! ```text
//!   reading ▲
//!           │            ┌──────────── On ─────────────┐
//!   on_thr ─┼────────────┼─────────────────────────────┼──────
//!           │   band     │  (no change while inside)   │
//!   off_thr─┼────────────┼─────────────────────────────┼──────
//!           │  Off ──────┘                             └── Off
//!           └──────────────────────────────────────────────────▶ t
//! ```
//!
//! The controller tracks the last *commanded* actuator state and compares
//! each fresh reading against it.  Commands are only issued on a
//! transition, so redundant decisions never reach the hardware.

use core::fmt;

use log::{debug, info};

use crate::app::ports::ActuatorPort;
use crate::error::{ActuatorError, ConfigError};

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// Commanded on/off state of the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActuatorState {
    #[default]
    Off,
    On,
}

impl ActuatorState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::On => write!(f, "on"),
        }
    }
}

/// Outcome of evaluating one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    NoChange,
    TurnOn,
    TurnOff,
}

impl Decision {
    /// The state this decision drives towards, if any.
    pub fn target(self) -> Option<ActuatorState> {
        match self {
            Self::NoChange => None,
            Self::TurnOn => Some(ActuatorState::On),
            Self::TurnOff => Some(ActuatorState::Off),
        }
    }
}

/// Validated threshold pair.  `on > off` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    on: f32,
    off: f32,
}

impl Thresholds {
    pub fn new(on: f32, off: f32) -> Result<Self, ConfigError> {
        if !on.is_finite() || !off.is_finite() {
            return Err(ConfigError::NonFiniteThreshold);
        }
        if on <= off {
            return Err(ConfigError::ThresholdsInverted { on, off });
        }
        Ok(Self { on, off })
    }

    pub fn on(&self) -> f32 {
        self.on
    }

    pub fn off(&self) -> f32 {
        self.off
    }

    /// Pure two-threshold rule.  Strict inequalities: a reading exactly at
    /// a threshold never changes state.
    pub fn evaluate(&self, reading: f32, current: ActuatorState) -> Decision {
        match current {
            ActuatorState::Off if reading > self.on => Decision::TurnOn,
            ActuatorState::On if reading < self.off => Decision::TurnOff,
            _ => Decision::NoChange,
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Hysteresis controller
pub struct HysteresisController {
    thresholds: Thresholds,
    /// Last successfully commanded state.
    state: ActuatorState,
    /// Commands that reached the actuator (including `force_off`).
    commands_sent: u64,
}

impl HysteresisController {
    /// Starts with the actuator assumed `Off`.
    pub fn new(thresholds: Thresholds) -> Self {
        Self::with_state(thresholds, ActuatorState::Off)
    }

    pub fn with_state(thresholds: Thresholds, state: ActuatorState) -> Self {
        Self {
            thresholds,
            state,
            commands_sent: 0,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Tracked (last commanded) actuator state.
    pub fn state(&self) -> ActuatorState {
        self.state
    }

    pub fn commands_sent(&self) -> u64 {
        self.commands_sent
    }

    /// Decide, without side effects, what `reading` means for `current`.
    pub fn evaluate(&self, reading: f32, current: ActuatorState) -> Decision {
        self.thresholds.evaluate(reading, current)
    }

    /// Apply a decision.  Issues at most one actuator command, and only
    /// when the decision moves away from the tracked state.  On failure the
    /// tracked state is left untouched so the next tick retries.
    pub fn apply(
        &mut self,
        decision: Decision,
        actuator: &mut impl ActuatorPort,
    ) -> Result<bool, ActuatorError> {
        let Some(target) = decision.target() else {
            return Ok(false);
        };
        if target == self.state {
            debug!("hysteresis: {:?} suppressed, already {}", decision, target);
            return Ok(false);
        }

        actuator.set(target)?;
        self.commands_sent += 1;
        info!("hysteresis: actuator {} -> {}", self.state, target);
        self.state = target;
        Ok(true)
    }

    /// Evaluate `reading` against the tracked state and apply the result.
    pub fn step(
        &mut self,
        reading: f32,
        actuator: &mut impl ActuatorPort,
    ) -> Result<Decision, ActuatorError> {
        let decision = self.evaluate(reading, self.state);
        self.apply(decision, actuator)?;
        Ok(decision)
    }

    /// Send `Off` regardless of the tracked state.  Shutdown path only.
    pub fn force_off(&mut self, actuator: &mut impl ActuatorPort) -> Result<(), ActuatorError> {
        actuator.set(ActuatorState::Off)?;
        self.commands_sent += 1;
        if self.state.is_on() {
            info!("hysteresis: forced off");
        }
        self.state = ActuatorState::Off;
        Ok(())
    }
}
