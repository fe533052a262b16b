//! Sensor drivers.
//!
//! Each driver implements [`SensorPort`](crate::app::ports::SensorPort)
//! directly; the control loop owns exactly one.

pub mod temperature;
