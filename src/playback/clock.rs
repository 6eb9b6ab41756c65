//! Playback clock
//!
//! Owns elapsed playback time. Time only moves through `tick`, one fixed
//! interval per tick while running; missed ticks are never replayed.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackClock {
    elapsed_seconds: f64,
    running: bool,
    tick_seconds: f64,
}

impl PlaybackClock {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            elapsed_seconds: 0.0,
            running: false,
            tick_seconds: tick_interval.as_secs_f64(),
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance by one tick interval
    ///
    /// Returns false (and leaves time untouched) when the clock is stopped.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_seconds += self.tick_seconds;
        true
    }

    /// Jump to a position, keeping the running flag
    pub fn set_elapsed(&mut self, seconds: f64) {
        self.elapsed_seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    }

    /// Stop and rewind to zero
    pub fn reset(&mut self) {
        self.elapsed_seconds = 0.0;
        self.running = false;
    }
}
