//! Playback state snapshot
//!
//! The single value shared between the primary view and the detached
//! renderer. Every publish is a fresh copy; nothing holds a reference into
//! engine internals.

use serde::{Deserialize, Serialize};

/// Immutable playback state record
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// Seconds of active playback
    pub elapsed_time_seconds: f64,
    /// Whether the clock is running
    pub is_playing: bool,
    /// Index of the word under the reading cursor
    pub current_word_index: u32,
    /// Remaining countdown seconds (0 when not counting down)
    pub countdown_value: u32,
    /// Whether the pre-roll countdown is running
    pub is_counting_down: bool,
}

/// Coarse phase derived from a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Not started, or reset by restart
    Idle,
    /// Pre-roll countdown running
    CountingDown,
    /// Clock running
    Playing,
    /// Stopped mid-script
    Paused,
}

impl PlaybackState {
    pub fn phase(&self) -> PlaybackPhase {
        if self.is_counting_down {
            PlaybackPhase::CountingDown
        } else if self.is_playing {
            PlaybackPhase::Playing
        } else if self.elapsed_time_seconds > 0.0 || self.current_word_index > 0 {
            PlaybackPhase::Paused
        } else {
            PlaybackPhase::Idle
        }
    }
}
