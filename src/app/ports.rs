//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (thermal zone, GPIO line, event sinks) implement these
//! traits.  The [`ControlLoop`](super::control_loop::ControlLoop) consumes
//! them via generics, so the domain core never touches hardware directly.
//!
//! All port errors are typed, so callers must handle every variant
//! explicitly.

use crate::control::hysteresis::ActuatorState;
use crate::error::{ActuatorError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per tick.
pub trait SensorPort {
    /// Current sensor value (degrees Celsius for the thermal zone).
    fn read(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the actuator.
pub trait ActuatorPort {
    /// Drive the physical output to `state`.
    fn set(&mut self, state: ActuatorState) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

impl<T: SensorPort + ?Sized> SensorPort for &mut T {
    fn read(&mut self) -> Result<f32, SensorError> {
        (**self).read()
    }
}

impl<T: ActuatorPort + ?Sized> ActuatorPort for &mut T {
    fn set(&mut self, state: ActuatorState) -> Result<(), ActuatorError> {
        (**self).set(state)
    }
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn emit(&mut self, event: &super::events::AppEvent) {
        (**self).emit(event);
    }
}
