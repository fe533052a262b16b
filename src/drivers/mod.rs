//! Actuator drivers and pin backends.

pub mod fan;
pub mod sysfs_gpio;
