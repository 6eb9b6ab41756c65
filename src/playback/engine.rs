//! Playback engine
//!
//! Pure state machine over the clock, the countdown and the content. Every
//! control action returns a `Transition` telling the owner whether to publish
//! and which timer should be running afterwards; the engine itself never
//! touches a scheduler.

use std::sync::Arc;

use crate::script::TeleprompterContent;
use crate::settings::TeleprompterSettings;

use super::clock::PlaybackClock;
use super::countdown::{Countdown, CountdownTick};
use super::progress::{current_word_index, elapsed_for_word};
use super::speed::SegmentTimeline;
use super::state::PlaybackState;

/// Seconds of reading skipped by one seek
pub const SEEK_SECONDS: u32 = 10;

/// Timer the owner should run after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEffect {
    /// Leave the current timer alone
    Keep,
    /// Cancel any timer and start the once-per-second countdown timer
    StartCountdown,
    /// Cancel any timer and start the playback tick timer
    StartClock,
    /// Cancel any timer
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Whether state changed and must be republished
    pub publish: bool,
    pub timer: TimerEffect,
}

impl Transition {
    const NONE: Self = Self {
        publish: false,
        timer: TimerEffect::Keep,
    };

    fn publish(timer: TimerEffect) -> Self {
        Self {
            publish: true,
            timer,
        }
    }
}

pub struct PlaybackEngine {
    content: Arc<TeleprompterContent>,
    settings: TeleprompterSettings,
    clock: PlaybackClock,
    countdown: Countdown,
    timeline: SegmentTimeline,
}

impl std::fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("words", &self.content.word_count())
            .field("segments", &self.content.segments.len())
            .field("clock", &self.clock)
            .field("countdown", &self.countdown)
            .finish()
    }
}

impl PlaybackEngine {
    /// Create an idle engine
    ///
    /// `settings` are expected to be validated already.
    pub fn new(content: Arc<TeleprompterContent>, settings: TeleprompterSettings) -> Self {
        let timeline = SegmentTimeline::estimated(
            &content.segments.segments,
            settings.font_size as f32,
            settings.default_scroll_speed,
        );
        Self {
            clock: PlaybackClock::new(settings.tick_interval()),
            countdown: Countdown::new(settings.countdown_seconds),
            content,
            settings,
            timeline,
        }
    }

    pub fn content(&self) -> &Arc<TeleprompterContent> {
        &self.content
    }

    pub fn settings(&self) -> &TeleprompterSettings {
        &self.settings
    }

    pub fn timeline(&self) -> &SegmentTimeline {
        &self.timeline
    }

    /// Replace the layout timeline once real segment heights are known
    pub fn set_segment_heights(&mut self, heights: &[f32]) {
        self.timeline = SegmentTimeline::new(
            &self.content.segments.segments,
            heights,
            self.settings.font_size as f32,
            self.settings.default_scroll_speed,
        );
    }

    /// Current immutable state record
    pub fn snapshot(&self) -> PlaybackState {
        PlaybackState {
            elapsed_time_seconds: self.clock.elapsed_seconds(),
            is_playing: self.clock.is_running(),
            current_word_index: self.word_index() as u32,
            countdown_value: self.countdown.value(),
            is_counting_down: self.countdown.is_active(),
        }
    }

    fn word_index(&self) -> usize {
        current_word_index(
            self.clock.elapsed_seconds(),
            self.content.word_count(),
            self.settings.words_per_minute,
        )
    }

    /// Whether the clock or the countdown is running
    pub fn is_active(&self) -> bool {
        self.clock.is_running() || self.countdown.is_active()
    }

    pub fn play(&mut self) -> Transition {
        if self.is_active() {
            return Transition::NONE;
        }

        // The countdown only runs from the very start of the script
        if self.clock.elapsed_seconds() == 0.0 && self.countdown.start() {
            tracing::debug!("Countdown started from {}", self.countdown.value());
            return Transition::publish(TimerEffect::StartCountdown);
        }

        self.clock.start();
        tracing::debug!("Playback started at {:.2}s", self.clock.elapsed_seconds());
        Transition::publish(TimerEffect::StartClock)
    }

    pub fn pause(&mut self) -> Transition {
        if self.countdown.is_active() {
            self.countdown.cancel();
            tracing::debug!("Countdown cancelled");
            return Transition::publish(TimerEffect::Stop);
        }

        if self.clock.is_running() {
            self.clock.stop();
            tracing::debug!("Playback paused at {:.2}s", self.clock.elapsed_seconds());
            return Transition::publish(TimerEffect::Stop);
        }

        Transition::NONE
    }

    pub fn toggle_play_pause(&mut self) -> Transition {
        if self.is_active() {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Rewind to the start and stop everything
    pub fn restart(&mut self) -> Transition {
        self.countdown.cancel();
        self.clock.reset();
        tracing::debug!("Playback restarted");
        Transition::publish(TimerEffect::Stop)
    }

    /// One playback clock tick
    pub fn tick_clock(&mut self) -> Transition {
        if self.clock.tick() {
            Transition::publish(TimerEffect::Keep)
        } else {
            Transition::NONE
        }
    }

    /// One countdown tick
    pub fn tick_countdown(&mut self) -> Transition {
        match self.countdown.tick() {
            CountdownTick::Remaining(_) => Transition::publish(TimerEffect::Keep),
            CountdownTick::Finished => {
                self.clock.start();
                tracing::debug!("Countdown finished, playback started");
                Transition::publish(TimerEffect::StartClock)
            }
            CountdownTick::Inactive => Transition::NONE,
        }
    }

    /// Words skipped by one seek
    pub fn seek_step(&self) -> usize {
        let words = u64::from(SEEK_SECONDS) * u64::from(self.settings.words_per_minute) / 60;
        usize::try_from(words).unwrap_or(usize::MAX)
    }

    pub fn seek_forward(&mut self) -> Transition {
        let last = self.content.word_count().saturating_sub(1);
        let target = self.word_index().saturating_add(self.seek_step()).min(last);
        self.seek_to_word(target)
    }

    pub fn seek_backward(&mut self) -> Transition {
        let target = self.word_index().saturating_sub(self.seek_step());
        self.seek_to_word(target)
    }

    fn seek_to_word(&mut self, target: usize) -> Transition {
        if target == self.word_index() {
            return Transition::NONE;
        }

        self.clock
            .set_elapsed(elapsed_for_word(target, self.settings.words_per_minute));
        tracing::debug!(
            "Seek to word {} ({:.2}s)",
            target,
            self.clock.elapsed_seconds()
        );
        Transition::publish(TimerEffect::Keep)
    }
}
