//! Playback module
//!
//! Everything that turns parsed content into a moving reading cursor:
//! - `clock`: elapsed time advanced by fixed ticks
//! - `countdown`: optional pre-roll before the clock starts
//! - `progress`: elapsed time -> word index, highlight progress and fade
//! - `speed`: per-segment scroll speed and layout timeline
//! - `engine`: the state machine combining the above
//! - `scheduler`: repeating timer capability (tokio and virtual clock)
//! - `state`: the published state record

pub mod clock;
pub mod countdown;
pub mod engine;
pub mod progress;
pub mod scheduler;
pub mod speed;
mod state;

pub use clock::PlaybackClock;
pub use countdown::{Countdown, CountdownTick};
pub use engine::{PlaybackEngine, TimerEffect, Transition};
pub use progress::{
    WordStyle, current_word_index, highlight_progress, word_alpha, word_style, word_styles,
};
pub use scheduler::{ManualScheduler, Scheduler, TickCallback, TimerId, TokioScheduler};
pub use speed::{SegmentPosition, SegmentTimeline, estimate_segment_duration, scroll_speed};
pub use state::{PlaybackPhase, PlaybackState};
