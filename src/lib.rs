//! fanctl library.
//!
//! Exposes the pure-logic modules (hysteresis controller, control loop,
//! lifecycle) and the Linux adapters (thermal zone sensor, sysfs GPIO fan
//! driver) for integration testing and reuse.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod sensors;

pub use app::control_loop::{ControlLoop, LoopReport};
pub use app::lifecycle::{ControllerStatus, LoopHandle};
pub use control::hysteresis::{ActuatorState, Decision, HysteresisController, Thresholds};
pub use error::{ActuatorError, ConfigError, Error, SensorError};
