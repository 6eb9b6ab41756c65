//! Segment scroll speed
//!
//! A timed segment scrolls its whole rendered height in exactly its duration;
//! untimed segments scroll at the pace-derived default speed.
//!
//! `SegmentTimeline` precomputes, per segment, the effective duration
//! (explicit or estimated), the effective start time and the rendered height,
//! so that locating the current segment each frame is a short walk.

use crate::script::Segment;

/// Line height as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.5;

/// Calculate scroll speed for a segment in pixels per second
///
/// # Arguments
/// * `segment` - The segment being scrolled
/// * `rendered_height` - Height of the segment in pixels
/// * `default_speed` - Speed for segments without a usable duration
pub fn scroll_speed(segment: &Segment, rendered_height: f32, default_speed: f32) -> f32 {
    match segment.duration_seconds {
        Some(duration) if duration > 0 => rendered_height / duration as f32,
        _ => default_speed,
    }
}

/// Height a segment would take with plain line layout
pub fn estimate_segment_height(segment: &Segment, font_size: f32) -> f32 {
    segment.line_count() as f32 * font_size * LINE_HEIGHT_FACTOR
}

/// Estimated scroll duration of an untimed segment, at least one second
///
/// Only used to chain start times; never overrides an explicit duration.
/// `default_speed` must be positive (validated by settings).
pub fn estimate_segment_duration(segment: &Segment, font_size: f32, default_speed: f32) -> u32 {
    let seconds = estimate_segment_height(segment, font_size) / default_speed;
    (seconds as u32).max(1)
}

/// Effective duration used when walking segments in time
pub fn effective_duration(segment: &Segment, font_size: f32, default_speed: f32) -> u32 {
    segment
        .duration_seconds
        .unwrap_or_else(|| estimate_segment_duration(segment, font_size, default_speed))
}

/// Per-segment timing and layout entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineEntry {
    /// Effective start time in seconds
    pub start_seconds: f64,
    /// Effective duration in seconds
    pub duration_seconds: f64,
    /// Rendered height in pixels
    pub height: f32,
    /// Height of all preceding segments
    pub offset: f32,
    /// Scroll speed in pixels per second
    pub speed: f32,
}

/// Where playback currently is within the segment layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPosition {
    pub index: usize,
    /// Seconds spent inside the current segment
    pub time_into_segment: f64,
    /// Scroll speed of the current segment (px/s)
    pub speed: f32,
    /// Total scroll offset from the top of the script (px)
    pub scroll_offset: f32,
}

/// Precomputed timing and layout of all segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentTimeline {
    entries: Vec<TimelineEntry>,
}

impl SegmentTimeline {
    /// Build a timeline from segments and their rendered heights
    ///
    /// Missing heights (a shorter `heights` slice) fall back to the plain
    /// line layout estimate.
    pub fn new(segments: &[Segment], heights: &[f32], font_size: f32, default_speed: f32) -> Self {
        let mut entries = Vec::with_capacity(segments.len());
        let mut start = 0.0;
        let mut offset = 0.0;

        for (i, segment) in segments.iter().enumerate() {
            let height = heights
                .get(i)
                .copied()
                .filter(|h| h.is_finite() && *h >= 0.0)
                .unwrap_or_else(|| estimate_segment_height(segment, font_size));
            let duration = f64::from(effective_duration(segment, font_size, default_speed));

            entries.push(TimelineEntry {
                start_seconds: start,
                duration_seconds: duration,
                height,
                offset,
                speed: scroll_speed(segment, height, default_speed),
            });

            start += duration;
            offset += height;
        }

        Self { entries }
    }

    /// Build a timeline using estimated heights only
    pub fn estimated(segments: &[Segment], font_size: f32, default_speed: f32) -> Self {
        Self::new(segments, &[], font_size, default_speed)
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all effective durations
    pub fn total_seconds(&self) -> f64 {
        self.entries
            .last()
            .map_or(0.0, |e| e.start_seconds + e.duration_seconds)
    }

    /// Sum of all rendered heights
    pub fn total_height(&self) -> f32 {
        self.entries.last().map_or(0.0, |e| e.offset + e.height)
    }

    /// Index of the segment active at `elapsed_seconds`
    ///
    /// Walks segments accumulating effective durations until the running
    /// total exceeds the elapsed time. Past the end, the last segment stays
    /// current.
    pub fn segment_index_at(&self, elapsed_seconds: f64) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }

        let elapsed = elapsed_seconds.max(0.0);
        let index = self
            .entries
            .iter()
            .position(|e| e.start_seconds + e.duration_seconds > elapsed)
            .unwrap_or(self.entries.len() - 1);
        Some(index)
    }

    /// Locate playback within the layout
    pub fn locate(&self, elapsed_seconds: f64) -> Option<SegmentPosition> {
        let index = self.segment_index_at(elapsed_seconds)?;
        let entry = self.entries[index];
        let time_into_segment = (elapsed_seconds.max(0.0) - entry.start_seconds).max(0.0);
        let scrolled = (time_into_segment as f32 * entry.speed).min(entry.height);

        Some(SegmentPosition {
            index,
            time_into_segment,
            speed: entry.speed,
            scroll_offset: entry.offset + scrolled,
        })
    }
}
