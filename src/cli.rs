//! Command-line interface.
//!
//! Every tunable is optional on the command line so that values from a
//! `--config` file are only overridden when a flag is actually given.
//! Underscore spellings (`--on_threshold`) are accepted as aliases.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::ControllerConfig;

#[derive(Debug, Parser)]
#[command(name = "fanctl", version, about = "Hysteresis fan controller")]
pub struct Cli {
    /// GPIO line driving the fan [default: 17]
    #[arg(long)]
    pub pin: Option<u32>,

    /// Temperature (C) above which the fan turns on [default: 65]
    #[arg(long = "on-threshold", visible_alias = "on_threshold")]
    pub on_threshold: Option<f32>,

    /// Temperature (C) below which the fan turns off [default: 55]
    #[arg(long = "off-threshold", visible_alias = "off_threshold")]
    pub off_threshold: Option<f32>,

    /// Seconds between temperature polls [default: 5]
    #[arg(long = "poll-interval", visible_alias = "poll_interval")]
    pub poll_interval: Option<f32>,

    /// Drive the pin LOW to turn the fan on
    #[arg(long)]
    pub active_low: bool,

    /// Thermal zone file reporting millidegrees C
    #[arg(long)]
    pub thermal_zone: Option<PathBuf>,

    /// Root of the sysfs GPIO tree
    #[arg(long)]
    pub gpio_root: Option<PathBuf>,

    /// JSON config file; flags override its values
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (e.g. "debug", "fanctl=trace")
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Merge defaults, the optional config file, and explicit flags.
    pub fn resolve(&self) -> Result<ControllerConfig> {
        let mut cfg = match &self.config {
            Some(path) => ControllerConfig::from_json_file(path)?,
            None => ControllerConfig::default(),
        };

        if let Some(pin) = self.pin {
            cfg.gpio_pin = pin;
        }
        if let Some(on) = self.on_threshold {
            cfg.on_threshold_c = on;
        }
        if let Some(off) = self.off_threshold {
            cfg.off_threshold_c = off;
        }
        if let Some(secs) = self.poll_interval {
            cfg.poll_interval_secs = secs;
        }
        if self.active_low {
            cfg.active_low = true;
        }
        if let Some(zone) = &self.thermal_zone {
            cfg.thermal_zone.clone_from(zone);
        }
        if let Some(root) = &self.gpio_root {
            cfg.gpio_root.clone_from(root);
        }
        Ok(cfg)
    }
}
