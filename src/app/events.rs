//! Outbound application events.
//!
//! The [`ControlLoop`](super::control_loop::ControlLoop) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them.

use crate::control::hysteresis::{ActuatorState, Decision};
use crate::error::{ActuatorError, SensorError};

use super::lifecycle::ControllerStatus;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The loop entered `Running`.
    Started { on_threshold: f32, off_threshold: f32 },

    /// One completed tick: the reading and what was decided.
    Tick {
        tick: u64,
        reading: f32,
        decision: Decision,
        state: ActuatorState,
    },

    /// The tracked actuator state changed.
    StateChanged {
        from: ActuatorState,
        to: ActuatorState,
        reading: f32,
    },

    /// Sensor read failed; tick skipped.
    ReadFailed { tick: u64, error: SensorError },

    /// Actuator command failed; tracked state unchanged.
    CommandFailed {
        tick: u64,
        intended: ActuatorState,
        error: ActuatorError,
    },

    /// Lifecycle status transition.
    StatusChanged {
        from: ControllerStatus,
        to: ControllerStatus,
    },
}
