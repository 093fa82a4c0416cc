//! Loop Arbiter
//!
//! Decides what the main loop runs on each pass. The radar sweep and the
//! telemetry readout share one execution context and never run together:
//! - radar active: only the sweep runs
//! - radar inactive: telemetry runs once per interval

use embassy_time::{Duration, Instant};

/// Time between telemetry readouts while the radar is off
pub const TELEMETRY_INTERVAL: Duration = Duration::from_millis(2000);

/// Work selected for one loop pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    /// Advance the radar sweep
    Radar,
    /// Read the telemetry sensors
    Telemetry,
    /// Nothing due
    Idle,
}

/// Round selection between radar and telemetry
#[derive(Debug, Clone, Copy)]
pub struct LoopArbiter {
    interval: Duration,
    last_telemetry: Option<Instant>,
}

impl Default for LoopArbiter {
    fn default() -> Self {
        Self::new(TELEMETRY_INTERVAL)
    }
}

impl LoopArbiter {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_telemetry: None,
        }
    }

    /// Picks the slot for this pass and books a telemetry readout if selected
    pub fn select(&mut self, now: Instant, radar_active: bool) -> Slot {
        if radar_active {
            return Slot::Radar;
        }
        let due = self
            .last_telemetry
            .map_or(true, |last| now.saturating_duration_since(last) > self.interval);
        if due {
            self.last_telemetry = Some(now);
            Slot::Telemetry
        } else {
            Slot::Idle
        }
    }
}
