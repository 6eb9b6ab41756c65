//! Script parser
//!
//! Splits raw annotated text into raw segments at `[time mm:ss]` markers and
//! collects every `[note ...]` marker.
//!
//! ## Example
//! ```text
//! Welcome! [time 00:30]
//! This scrolls in 30 seconds.
//!
//! [time 01:00]
//! This scrolls in 1 minute.
//! [note remember to smile]
//! ```
//!
//! A time marker closes the text seen since the previous marker, attaching the
//! duration that was pending before it, and opens a new pending duration for
//! the text that follows. Back-to-back markers keep only the later duration.

use std::ops::Range;

use super::markers::{TokenKind, strip_time_markers, tokenize};
use super::types::{NoteRange, RawSegment};

/// Parser output
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedScript {
    pub segments: Vec<RawSegment>,
    pub note_ranges: Vec<NoteRange>,
    /// Whether any `[time]` marker was seen
    pub has_timing: bool,
}

/// Clean a slice of script text for display
///
/// - Removes `[time mm:ss]` markers
/// - Preserves `[note content]` markers
/// - Normalizes line breaks and trims
pub fn clean_segment_text(text: &str) -> String {
    strip_time_markers(text)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .trim()
        .to_string()
}

fn close_segment(parsed: &mut ParsedScript, raw: &str, span: Range<usize>, duration: Option<u32>) {
    let cleaned = clean_segment_text(&raw[span.clone()]);
    if !cleaned.trim().is_empty() {
        parsed.segments.push(RawSegment {
            text: cleaned,
            duration_seconds: duration,
            source_range: span,
        });
    }
}

/// Parse raw script text into raw segments and note ranges
pub fn parse(raw: &str) -> ParsedScript {
    let mut parsed = ParsedScript::default();
    let mut last_end = 0;
    let mut pending_duration: Option<u32> = None;

    for token in tokenize(raw) {
        match token.kind {
            TokenKind::Text => {}
            TokenKind::Note { content } => parsed.note_ranges.push(NoteRange {
                full_start: token.range.start,
                full_end: token.range.end,
                content: raw[content.clone()].to_string(),
                content_start: content.start,
                content_end: content.end,
            }),
            TokenKind::Time { seconds } => {
                close_segment(&mut parsed, raw, last_end..token.range.start, pending_duration);
                pending_duration = Some(seconds);
                parsed.has_timing = true;
                last_end = token.range.end;
            }
        }
    }

    // Remaining text after the last [time] marker
    close_segment(&mut parsed, raw, last_end..raw.len(), pending_duration);

    if parsed.segments.is_empty() && !raw.trim().is_empty() {
        parsed.segments.push(RawSegment {
            text: clean_segment_text(raw),
            duration_seconds: None,
            source_range: 0..raw.len(),
        });
    }

    tracing::debug!(
        "Parsed script: {} segments, {} notes, timing={}",
        parsed.segments.len(),
        parsed.note_ranges.len(),
        parsed.has_timing
    );

    parsed
}
