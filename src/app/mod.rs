//! Application core: pure domain logic with no I/O.
//!
//! The control loop, its lifecycle, and the events it emits.  All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod control_loop;
pub mod events;
pub mod lifecycle;
pub mod ports;
