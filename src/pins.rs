//! GPIO line and device-node defaults for the fan controller board.
//!
//! The config defaults and the drivers reference this module rather than
//! hard-coding numbers or paths.

// ---------------------------------------------------------------------------
// Fan output (NPN transistor / MOSFET gate, active HIGH)
// ---------------------------------------------------------------------------

/// BCM GPIO line driving the fan switch.
pub const FAN_GPIO: u32 = 17;

/// Root of the legacy sysfs GPIO interface.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

// ---------------------------------------------------------------------------
// Temperature source
// ---------------------------------------------------------------------------

/// SoC thermal zone.  Reports millidegrees Celsius as ASCII.
pub const CPU_THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";
