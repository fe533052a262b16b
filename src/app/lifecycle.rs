//! Control-loop lifecycle and the cross-thread stop signal.
//!
//! ```text
//!   Idle ──start──▶ Running ──terminate──▶ Stopping ──force_off──▶ Stopped
//!     └──────────────terminate (before start)──▶┘
//! ```
//!
//! The status lives behind a `parking_lot::Mutex` paired with a `Condvar`.
//! The control thread sleeps on the condvar between ticks, so a
//! `terminate()` from a signal handler or another thread wakes it
//! immediately instead of after the remaining poll interval.
//!
//! The tracked actuator state is mirrored into an atomic for observers;
//! only the control thread writes it.

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::info;
use parking_lot::{Condvar, Mutex};

use crate::control::hysteresis::ActuatorState;

/// Lifecycle of the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerStatus {
    Idle,
    Running,
    Stopping,
    Stopped,
}

impl fmt::Display for ControllerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

struct Shared {
    status: Mutex<ControllerStatus>,
    changed: Condvar,
    actuator_on: AtomicBool,
}

/// Cloneable, `Send + Sync` handle onto a control loop.
///
/// Safe to use from any thread, including a Ctrl+C handler.
#[derive(Clone)]
pub struct LoopHandle {
    shared: Arc<Shared>,
}

impl Default for LoopHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopHandle {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                status: Mutex::new(ControllerStatus::Idle),
                changed: Condvar::new(),
                actuator_on: AtomicBool::new(false),
            }),
        }
    }

    /// Request a stop.  Returns `true` if this call performed the
    /// transition; `false` if the loop was already stopping or stopped.
    pub fn terminate(&self) -> bool {
        let mut status = self.shared.status.lock();
        match *status {
            ControllerStatus::Idle | ControllerStatus::Running => {
                info!("lifecycle: stop requested while {}", *status);
                *status = ControllerStatus::Stopping;
                self.shared.changed.notify_all();
                true
            }
            ControllerStatus::Stopping | ControllerStatus::Stopped => false,
        }
    }

    pub fn status(&self) -> ControllerStatus {
        *self.shared.status.lock()
    }

    /// Last commanded actuator state as published by the control thread.
    pub fn actuator_state(&self) -> ActuatorState {
        if self.shared.actuator_on.load(Ordering::Acquire) {
            ActuatorState::On
        } else {
            ActuatorState::Off
        }
    }

    /// Block until the loop reaches `Stopped` or `timeout` elapses.
    /// Returns `true` if it stopped.
    pub fn wait_stopped(&self, timeout: Duration) -> bool {
        let mut status = self.shared.status.lock();
        let _ = self
            .shared
            .changed
            .wait_while_for(&mut status, |s| *s != ControllerStatus::Stopped, timeout);
        *status == ControllerStatus::Stopped
    }

    // ── Control-thread side ───────────────────────────────────

    /// `Idle → Running`.  On refusal returns the status that blocked it.
    pub(crate) fn try_start(&self) -> Result<(), ControllerStatus> {
        let mut status = self.shared.status.lock();
        if *status == ControllerStatus::Idle {
            *status = ControllerStatus::Running;
            self.shared.changed.notify_all();
            Ok(())
        } else {
            Err(*status)
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.status() == ControllerStatus::Running
    }

    /// Sleep for up to `interval`, returning early on a stop request.
    /// Returns `true` if the loop should run another tick.
    pub(crate) fn wait_next_tick(&self, interval: Duration) -> bool {
        let mut status = self.shared.status.lock();
        let _ = self
            .shared
            .changed
            .wait_while_for(&mut status, |s| *s == ControllerStatus::Running, interval);
        *status == ControllerStatus::Running
    }

    /// `Stopping → Stopped`.  Any other starting status is left alone.
    pub(crate) fn finish(&self) -> bool {
        let mut status = self.shared.status.lock();
        if *status == ControllerStatus::Stopping {
            *status = ControllerStatus::Stopped;
            self.shared.changed.notify_all();
            true
        } else {
            false
        }
    }

    pub(crate) fn publish_actuator(&self, state: ActuatorState) {
        self.shared.actuator_on.store(state.is_on(), Ordering::Release);
    }
}
