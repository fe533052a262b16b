//! Control loop, the hexagonal core.
//!
//! [`ControlLoop`] owns the hysteresis controller, the poll cadence, and
//! the termination protocol.  All I/O flows through port traits injected
//! at construction, making the whole loop testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │      ControlLoop        │
//! ActuatorPort ◀──│  Hysteresis · Lifecycle │ ◀── LoopHandle::terminate()
//!                 └────────────────────────┘
//! ```
//!
//! A tick is `read → evaluate → apply`.  The stop signal is only checked
//! between ticks, so a command is never left half-issued, and the wait
//! between ticks is interruptible.

use std::time::Duration;

use log::{error, info, warn};

use crate::config::ControllerConfig;
use crate::control::hysteresis::{ActuatorState, Decision, HysteresisController, Thresholds};
use crate::error::{ConfigError, Error};

use super::events::AppEvent;
use super::lifecycle::{ControllerStatus, LoopHandle};
use super::ports::{ActuatorPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// LoopReport
// ───────────────────────────────────────────────────────────────

/// Counters collected over one run of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopReport {
    /// Ticks attempted, including skipped ones.
    pub ticks: u64,
    pub read_failures: u64,
    pub actuator_failures: u64,
    /// Successful actuator state changes (excluding shutdown).
    pub transitions: u64,
    /// Tracked actuator state after shutdown.
    pub final_state: ActuatorState,
    /// `false` if the shutdown off command failed.
    pub shutdown_clean: bool,
}

// ───────────────────────────────────────────────────────────────
// ControlLoop
// ───────────────────────────────────────────────────────────────

pub struct ControlLoop<S, A, E> {
    sensor: S,
    actuator: A,
    sink: E,
    controller: HysteresisController,
    poll_interval: Duration,
    handle: LoopHandle,
    report: LoopReport,
}

impl<S: SensorPort, A: ActuatorPort, E: EventSink> ControlLoop<S, A, E> {
    /// Construct the loop.  Fails on a zero poll interval.
    ///
    /// Does **not** start polling; call [`start`](Self::start) next.
    pub fn new(
        thresholds: Thresholds,
        poll_interval: Duration,
        sensor: S,
        actuator: A,
        sink: E,
    ) -> Result<Self, ConfigError> {
        if poll_interval.is_zero() {
            return Err(ConfigError::NonPositivePollInterval);
        }
        Ok(Self {
            sensor,
            actuator,
            sink,
            controller: HysteresisController::new(thresholds),
            poll_interval,
            handle: LoopHandle::new(),
            report: LoopReport::default(),
        })
    }

    /// Construct from a full configuration, validating it first.
    pub fn from_config(
        config: &ControllerConfig,
        sensor: S,
        actuator: A,
        sink: E,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(config.thresholds()?, config.poll_interval()?, sensor, actuator, sink)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// A cloneable handle for stopping the loop from another thread.
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Run until terminated, then turn the actuator off.
    ///
    /// Blocks the calling thread.  The first tick runs immediately; each
    /// later tick follows a poll-interval wait that a stop request cuts
    /// short.  If a stop was requested before `start`, no tick runs and
    /// the loop goes straight to shutdown.
    pub fn start(&mut self) -> LoopReport {
        let from = match self.handle.try_start() {
            Ok(()) => {
                self.sink.emit(&AppEvent::StatusChanged {
                    from: ControllerStatus::Idle,
                    to: ControllerStatus::Running,
                });
                let t = self.controller.thresholds();
                self.sink.emit(&AppEvent::Started {
                    on_threshold: t.on(),
                    off_threshold: t.off(),
                });
                info!(
                    "ControlLoop started (on>{:.1}, off<{:.1}, every {:?})",
                    t.on(),
                    t.off(),
                    self.poll_interval
                );

                while self.handle.is_running() {
                    // Transient failures were already reported through the sink.
                    let _ = self.tick();
                    if !self.handle.wait_next_tick(self.poll_interval) {
                        break;
                    }
                }
                ControllerStatus::Running
            }
            Err(ControllerStatus::Stopping) => {
                info!("ControlLoop: stop requested before start");
                ControllerStatus::Idle
            }
            Err(status) => {
                warn!("ControlLoop: start ignored, loop already {}", status);
                return self.report;
            }
        };

        self.sink.emit(&AppEvent::StatusChanged {
            from,
            to: ControllerStatus::Stopping,
        });
        self.shutdown();
        self.report
    }

    /// Request a stop.  Same as `handle().terminate()`.
    pub fn terminate(&self) -> bool {
        self.handle.terminate()
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one tick: read → evaluate → apply.
    ///
    /// A failed read skips evaluation entirely.  A failed command leaves
    /// the tracked state unchanged so the next tick retries it.
    pub fn tick(&mut self) -> Result<Decision, Error> {
        self.report.ticks += 1;
        let tick = self.report.ticks;

        let reading = match self.sensor.read() {
            Ok(r) => r,
            Err(e) => {
                self.report.read_failures += 1;
                self.sink.emit(&AppEvent::ReadFailed { tick, error: e });
                return Err(e.into());
            }
        };

        let from = self.controller.state();
        let decision = self.controller.evaluate(reading, from);

        match self.controller.apply(decision, &mut self.actuator) {
            Ok(changed) => {
                let to = self.controller.state();
                self.handle.publish_actuator(to);
                if changed {
                    self.report.transitions += 1;
                    self.sink.emit(&AppEvent::StateChanged { from, to, reading });
                }
                self.sink.emit(&AppEvent::Tick {
                    tick,
                    reading,
                    decision,
                    state: to,
                });
                Ok(decision)
            }
            Err(e) => {
                self.report.actuator_failures += 1;
                let intended = decision.target().unwrap_or(from);
                self.sink.emit(&AppEvent::CommandFailed {
                    tick,
                    intended,
                    error: e,
                });
                Err(e.into())
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self) -> ControllerStatus {
        self.handle.status()
    }

    pub fn report(&self) -> LoopReport {
        self.report
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    // ── Internal ──────────────────────────────────────────────

    /// `Stopping → Stopped`, with exactly one `force_off` in between.
    fn shutdown(&mut self) {
        match self.controller.force_off(&mut self.actuator) {
            Ok(()) => {
                self.report.shutdown_clean = true;
                info!("ControlLoop: actuator off");
            }
            Err(e) => {
                self.report.shutdown_clean = false;
                error!("ControlLoop: shutdown off command failed: {}", e);
            }
        }
        self.handle.publish_actuator(self.controller.state());
        self.report.final_state = self.controller.state();

        if self.handle.finish() {
            self.sink.emit(&AppEvent::StatusChanged {
                from: ControllerStatus::Stopping,
                to: ControllerStatus::Stopped,
            });
        }
        info!("ControlLoop stopped after {} ticks", self.report.ticks);
    }
}
