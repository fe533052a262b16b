//! On/off fan driver over any embedded-hal output pin.
//!
//! The driver is a dumb actuator: it translates
//! [`ActuatorState`] into a pin level (optionally inverted for
//! active-low switching stages) and remembers what it last wrote.
//! Deciding *when* to switch is the hysteresis controller's job.

use embedded_hal::digital::{OutputPin, PinState};
use log::debug;

use crate::app::ports::ActuatorPort;
use crate::control::hysteresis::ActuatorState;
use crate::error::ActuatorError;

/// Pin level that drives the fan to `state`.
pub fn level_for(state: ActuatorState, active_low: bool) -> PinState {
    PinState::from(state.is_on() != active_low)
}

/// Level a freshly claimed line must start at so the fan is off.
pub fn off_level(active_low: bool) -> PinState {
    level_for(ActuatorState::Off, active_low)
}

pub struct FanDriver<P> {
    pin: P,
    active_low: bool,
    /// Level last written successfully, `None` before the first write.
    state: Option<ActuatorState>,
    writes: u64,
}

impl<P: OutputPin> FanDriver<P> {
    pub fn new(pin: P, active_low: bool) -> Self {
        Self {
            pin,
            active_low,
            state: None,
            writes: 0,
        }
    }

    /// Last state successfully driven onto the pin.
    pub fn state(&self) -> Option<ActuatorState> {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, Some(ActuatorState::On))
    }

    /// Successful pin writes so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}

impl<P> ActuatorPort for FanDriver<P>
where
    P: OutputPin,
    P::Error: Into<ActuatorError>,
{
    fn set(&mut self, state: ActuatorState) -> Result<(), ActuatorError> {
        let level = level_for(state, self.active_low);
        if let Err(e) = self.pin.set_state(level) {
            return Err(e.into());
        }
        debug!("fan: {} (pin {:?})", state, level);
        self.writes += 1;
        self.state = Some(state);
        Ok(())
    }
}

impl From<core::convert::Infallible> for ActuatorError {
    fn from(e: core::convert::Infallible) -> Self {
        match e {}
    }
}
