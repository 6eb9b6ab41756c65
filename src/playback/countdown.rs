//! Pre-roll countdown
//!
//! `Idle -> CountingDown -> Playing`, or straight to playing when the
//! configured length is zero. One tick per second.

/// Result of a countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Still counting, with the value to display
    Remaining(u32),
    /// Reached zero; playback should start
    Finished,
    /// No countdown was running
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    length: u32,
    remaining: Option<u32>,
}

impl Countdown {
    pub fn new(length_seconds: u32) -> Self {
        Self {
            length: length_seconds,
            remaining: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining.is_some()
    }

    /// Value to display, 0 when not counting
    pub fn value(&self) -> u32 {
        self.remaining.unwrap_or(0)
    }

    /// Begin a fresh countdown
    ///
    /// Returns false when the length is zero and playback should start
    /// immediately.
    pub fn start(&mut self) -> bool {
        if self.length == 0 {
            self.remaining = None;
            return false;
        }
        self.remaining = Some(self.length);
        true
    }

    pub fn tick(&mut self) -> CountdownTick {
        match self.remaining {
            None => CountdownTick::Inactive,
            Some(value) if value <= 1 => {
                self.remaining = None;
                CountdownTick::Finished
            }
            Some(value) => {
                self.remaining = Some(value - 1);
                CountdownTick::Remaining(value - 1)
            }
        }
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }
}
