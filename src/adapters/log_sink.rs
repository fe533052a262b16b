//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr, captured by the service manager in production).  Transient
//! failures go out at warning level.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::hysteresis::Decision;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                on_threshold,
                off_threshold,
            } => {
                info!("START | on>{:.1}\u{00b0}C off<{:.1}\u{00b0}C", on_threshold, off_threshold);
            }
            AppEvent::Tick {
                tick,
                reading,
                decision,
                state,
            } => {
                // Every poll reports its temperature at info.
                if *decision == Decision::NoChange {
                    info!("TICK  | #{} T={:.1}\u{00b0}C fan={}", tick, reading, state);
                } else {
                    info!(
                        "TICK  | #{} T={:.1}\u{00b0}C {:?} fan={}",
                        tick, reading, decision, state
                    );
                }
            }
            AppEvent::StateChanged { from, to, reading } => {
                info!("STATE | fan {} -> {} at {:.1}\u{00b0}C", from, to, reading);
            }
            AppEvent::ReadFailed { tick, error } => {
                warn!("FAULT | #{} sensor {}, tick skipped", tick, error);
            }
            AppEvent::CommandFailed {
                tick,
                intended,
                error,
            } => {
                warn!("FAULT | #{} fan {} failed: {}, will retry", tick, intended, error);
            }
            AppEvent::StatusChanged { from, to } => {
                info!("STATUS| {} -> {}", from, to);
            }
        }
    }
}
