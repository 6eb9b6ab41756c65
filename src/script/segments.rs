//! Segment table builder
//!
//! Turns parser output into display segments with cumulative start times, and
//! assembles the full `TeleprompterContent` for a session.
//!
//! Start times only accumulate explicit durations: a segment without a
//! `[time]` marker starts where the previous timed segment ended. Pace-based
//! estimates are applied later by the scroll timeline, never here.

use super::display::{build_display_text, extract_words};
use super::parser::{ParsedScript, parse};
use super::types::{Segment, SegmentTable, TeleprompterContent};

/// Build the segment table from parser output
pub fn build_segment_table(parsed: &ParsedScript) -> SegmentTable {
    let mut cumulative_time: u32 = 0;
    let mut segments = Vec::with_capacity(parsed.segments.len());

    for raw in &parsed.segments {
        let display = build_display_text(&raw.text).trimmed();
        segments.push(Segment {
            text: display.text,
            duration_seconds: raw.duration_seconds,
            start_time_seconds: cumulative_time,
            note_ranges: display.note_ranges,
        });

        if let Some(d) = raw.duration_seconds {
            cumulative_time = cumulative_time.saturating_add(d);
        }
    }

    // Total duration only if every segment has timing
    let total_duration_seconds =
        if parsed.has_timing && segments.iter().all(|s| s.duration_seconds.is_some()) {
            Some(segments.iter().filter_map(|s| s.duration_seconds).sum())
        } else {
            None
        };

    SegmentTable {
        segments,
        total_duration_seconds,
        has_timing: parsed.has_timing,
    }
}

/// Parse a script into the immutable content snapshot for one session
pub fn build_content(raw: &str) -> TeleprompterContent {
    let parsed = parse(raw);
    let display_text = build_display_text(raw);
    let words = extract_words(&display_text);
    let segments = build_segment_table(&parsed);

    tracing::debug!(
        "Built teleprompter content: {} words, {} notes, {} segments",
        words.len(),
        display_text.note_ranges.len(),
        segments.len()
    );

    TeleprompterContent {
        full_text: display_text.text,
        words,
        note_ranges: display_text.note_ranges,
        segments,
    }
}
