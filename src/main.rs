//! fanctl main entry point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  CpuTemperatureSensor   FanDriver<SysfsOutputPin>  LogEventSink │
//! │  (SensorPort)           (ActuatorPort)           (EventSink)   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              ControlLoop (pure logic)                  │    │
//! │  │  Hysteresis · Lifecycle                                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Ctrl+C / SIGTERM ──▶ LoopHandle::terminate()                  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;
use tracing_subscriber::EnvFilter;

use fanctl::adapters::log_sink::LogEventSink;
use fanctl::cli::Cli;
use fanctl::drivers::fan::{self, FanDriver};
use fanctl::drivers::sysfs_gpio::SysfsOutputPin;
use fanctl::sensors::temperature::CpuTemperatureSensor;
use fanctl::ControlLoop;

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    info!("fanctl v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Configuration (fatal on any error) ─────────────────
    let config = cli.resolve()?;
    config.validate().context("invalid configuration")?;
    info!(
        "Config: gpio={} active_low={} on>{} off<{} poll={}s",
        config.gpio_pin,
        config.active_low,
        config.on_threshold_c,
        config.off_threshold_c,
        config.poll_interval_secs
    );

    // ── 2. Construct adapters ─────────────────────────────────
    let sensor = CpuTemperatureSensor::new(&config.thermal_zone)
        .with_context(|| format!("opening {}", config.thermal_zone.display()))?;
    info!("Sensor: {}", sensor.path().display());
    let pin = SysfsOutputPin::export(&config.gpio_root, config.gpio_pin, fan::off_level(config.active_low))
        .with_context(|| format!("claiming GPIO {}", config.gpio_pin))?;
    let fan = FanDriver::new(pin, config.active_low);

    // ── 3. Control loop + stop signal ─────────────────────────
    let mut control = ControlLoop::from_config(&config, sensor, fan, LogEventSink::new())?;

    let handle = control.handle();
    ctrlc::set_handler(move || {
        if handle.terminate() {
            info!("Signal received, stopping");
        }
    })
    .context("installing signal handler")?;

    // ── 4. Run until terminated ───────────────────────────────
    let report = control.start();
    info!(
        "Summary: ticks={} transitions={} read_failures={} actuator_failures={} fan={}",
        report.ticks,
        report.transitions,
        report.read_failures,
        report.actuator_failures,
        report.final_state
    );

    if !report.shutdown_clean {
        bail!("fan could not be switched off during shutdown");
    }
    Ok(())
}
