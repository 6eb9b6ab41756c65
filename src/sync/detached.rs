//! Detached (picture-in-picture) rendering
//!
//! The platform decides once, when detached mode is entered, how the surface
//! is fed:
//! - `StateDriven`: the surface renders itself from content plus state
//!   snapshots (web views, native views with their own layout)
//! - `PixelDriven`: the host draws frames; the session hands it a
//!   `FrameDescriptor` per publish (video-frame PiP backends)
//!
//! Sinks are called with the session lock held and must not call back into
//! the session synchronously. Forward surface input as `SurfaceEvent`s
//! through a channel instead.

use std::sync::Arc;

use anyhow::Result;

use crate::playback::progress::highlight_progress;
use crate::playback::{PlaybackState, SegmentTimeline};
use crate::script::{Segment, TeleprompterContent};
use crate::settings::TeleprompterSettings;

/// Everything a pixel-driven surface needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameDescriptor {
    /// Current segment, `None` for empty scripts
    pub segment_index: Option<usize>,
    /// Scroll offset from the top of the script (px)
    pub scroll_offset: f32,
    /// Scroll speed of the current segment (px/s)
    pub scroll_speed: f32,
    /// Continuous cursor position in words, `-inf` before start
    pub highlight_progress: f64,
    pub current_word_index: u32,
    pub is_playing: bool,
    pub is_counting_down: bool,
    pub countdown_value: u32,
    /// Remaining presentation time, when a timer is configured
    pub remaining_seconds: Option<f64>,
    pub dark_mode: bool,
    pub font_size: u32,
    pub opacity: f32,
}

impl FrameDescriptor {
    pub fn compose(
        state: &PlaybackState,
        settings: &TeleprompterSettings,
        timeline: &SegmentTimeline,
    ) -> Self {
        let elapsed = state.elapsed_time_seconds;
        let position = timeline.locate(elapsed);

        Self {
            segment_index: position.map(|p| p.index),
            scroll_offset: position.map_or(0.0, |p| p.scroll_offset),
            scroll_speed: position.map_or(settings.default_scroll_speed, |p| p.speed),
            highlight_progress: highlight_progress(
                elapsed,
                settings.words_per_minute,
                state.is_playing,
            ),
            current_word_index: state.current_word_index,
            is_playing: state.is_playing,
            is_counting_down: state.is_counting_down,
            countdown_value: state.countdown_value,
            remaining_seconds: settings
                .timer_duration_seconds
                .map(|total| (f64::from(total) - elapsed).max(0.0)),
            dark_mode: settings.dark_mode,
            font_size: settings.font_size,
            opacity: settings.opacity,
        }
    }
}

/// Surface that renders from content and state snapshots
pub trait StateSink: Send {
    /// Full content plus the latest state, sent on attach and on `Ready`
    fn on_cold_start(&mut self, content: &Arc<TeleprompterContent>, state: &PlaybackState);

    fn push_state(&mut self, state: &PlaybackState);

    fn teardown(&mut self) {}
}

/// Surface that is fed rendered frame descriptors
pub trait FrameSink: Send {
    /// Rendered height of a segment in pixels, if the host can measure it
    ///
    /// Unmeasured segments use the line layout estimate.
    fn measure_segment(&mut self, _segment: &Segment, _font_size: u32) -> Option<f32> {
        None
    }

    fn submit_frame(&mut self, frame: &FrameDescriptor);

    fn teardown(&mut self) {}
}

/// How the detached surface is fed, resolved once per entry
pub enum DetachedFrameSink {
    StateDriven(Box<dyn StateSink>),
    PixelDriven(Box<dyn FrameSink>),
}

impl std::fmt::Debug for DetachedFrameSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StateDriven(_) => write!(f, "StateDriven"),
            Self::PixelDriven(_) => write!(f, "PixelDriven"),
        }
    }
}

/// Platform capability for detached surfaces
pub trait DetachedPlatform {
    /// Whether this platform can show a detached surface at all
    fn is_supported(&self) -> bool;

    /// Open the surface
    fn open_sink(&self) -> Result<DetachedFrameSink>;
}

/// Platform without detached surface support
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDetachedPlatform;

impl DetachedPlatform for NoDetachedPlatform {
    fn is_supported(&self) -> bool {
        false
    }

    fn open_sink(&self) -> Result<DetachedFrameSink> {
        anyhow::bail!("Detached surfaces are not supported on this platform")
    }
}

/// Outcome of `enter_detached_mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachedMode {
    Entered,
    AlreadyActive,
    /// Platform cannot show a detached surface; keep using the primary view
    Unsupported,
}

/// Active detached renderer
#[derive(Debug)]
pub struct DetachedRenderer {
    sink: DetachedFrameSink,
    frames_pushed: u64,
}

impl DetachedRenderer {
    pub fn new(sink: DetachedFrameSink) -> Self {
        Self {
            sink,
            frames_pushed: 0,
        }
    }

    pub fn is_pixel_driven(&self) -> bool {
        matches!(self.sink, DetachedFrameSink::PixelDriven(_))
    }

    /// Number of states or frames pushed since attach
    pub fn frames_pushed(&self) -> u64 {
        self.frames_pushed
    }

    /// Ask a pixel-driven sink for segment heights
    ///
    /// Returns `None` when the sink measures nothing, so callers keep their
    /// estimated layout.
    pub fn measure(&mut self, segments: &[Segment], font_size: u32) -> Option<Vec<f32>> {
        let DetachedFrameSink::PixelDriven(sink) = &mut self.sink else {
            return None;
        };

        let heights: Vec<Option<f32>> = segments
            .iter()
            .map(|segment| sink.measure_segment(segment, font_size))
            .collect();
        if heights.iter().all(Option::is_none) {
            return None;
        }

        // NaN marks an unmeasured segment; the timeline estimates those
        Some(heights.into_iter().map(|h| h.unwrap_or(f32::NAN)).collect())
    }

    /// Send everything the surface needs to render from scratch
    pub fn cold_start(
        &mut self,
        content: &Arc<TeleprompterContent>,
        state: &PlaybackState,
        frame: &FrameDescriptor,
    ) {
        match &mut self.sink {
            DetachedFrameSink::StateDriven(sink) => sink.on_cold_start(content, state),
            DetachedFrameSink::PixelDriven(sink) => sink.submit_frame(frame),
        }
        self.frames_pushed += 1;
    }

    /// Push one published state
    pub fn push(&mut self, state: &PlaybackState, frame: impl FnOnce() -> FrameDescriptor) {
        match &mut self.sink {
            DetachedFrameSink::StateDriven(sink) => sink.push_state(state),
            DetachedFrameSink::PixelDriven(sink) => sink.submit_frame(&frame()),
        }
        self.frames_pushed += 1;
    }

    pub fn teardown(mut self) {
        match &mut self.sink {
            DetachedFrameSink::StateDriven(sink) => sink.teardown(),
            DetachedFrameSink::PixelDriven(sink) => sink.teardown(),
        }
    }
}
