//! Script data types
//!
//! Owned variants, produced once per parse and never mutated afterwards.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A `[note ...]` marker located in the original script
///
/// Offsets are byte offsets into the raw script text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRange {
    /// Start of the whole marker (the opening bracket)
    pub full_start: usize,
    /// End of the whole marker (one past the closing bracket)
    pub full_end: usize,
    /// Start of the note content
    pub content_start: usize,
    /// End of the note content
    pub content_end: usize,
    /// The note content
    pub content: String,
}

/// Half-open byte range `[start, end)` into display text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether `other` lies entirely inside this range
    pub fn contains_range(&self, other: &TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Text actually shown to the reader
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTextResult {
    /// Script text with notes unwrapped and time markers removed
    pub text: String,
    /// Note content ranges into `text`, ordered and non-overlapping
    pub note_ranges: Vec<TextRange>,
}

/// A single addressable word of display text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub text: String,
    /// Byte offset of the first character in display text
    pub start_index: usize,
    /// Byte offset one past the last character in display text
    pub end_index: usize,
    /// Whether the word lies entirely inside a note
    pub is_note: bool,
}

/// Parser output for one segment, before display conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment {
    /// Cleaned text: time markers removed, line breaks normalized, trimmed.
    /// Note markers are still present.
    pub text: String,
    /// Explicit duration from the preceding `[time]` marker
    pub duration_seconds: Option<u32>,
    /// Byte range of the segment's source slice in the raw script
    pub source_range: Range<usize>,
}

/// A contiguous run of display text with its own scroll-speed basis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Display text of this segment (notes unwrapped)
    pub text: String,
    /// Duration in seconds (None = use default speed)
    pub duration_seconds: Option<u32>,
    /// Cumulative start time in seconds from the beginning
    pub start_time_seconds: u32,
    /// Note ranges into `text`
    #[serde(default)]
    pub note_ranges: Vec<TextRange>,
}

impl Segment {
    /// Number of rendered lines, never less than one
    pub fn line_count(&self) -> usize {
        self.text.lines().count().max(1)
    }
}

/// Ordered segments of a script
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentTable {
    pub segments: Vec<Segment>,
    /// Total duration if every segment has timing, None otherwise
    pub total_duration_seconds: Option<u32>,
    /// Whether any `[time]` marker was present
    pub has_timing: bool,
}

impl SegmentTable {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Parsed, immutable snapshot handed to the playback engine for one session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeleprompterContent {
    pub full_text: String,
    pub words: Vec<Word>,
    pub note_ranges: Vec<TextRange>,
    pub segments: SegmentTable,
}

impl TeleprompterContent {
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_range_contains() {
        let outer = TextRange::new(2, 10);
        assert!(outer.contains_range(&TextRange::new(2, 10)));
        assert!(outer.contains_range(&TextRange::new(4, 6)));
        assert!(!outer.contains_range(&TextRange::new(1, 6)));
        assert!(!outer.contains_range(&TextRange::new(8, 11)));
    }

    #[test]
    fn test_segment_line_count_never_zero() {
        let segment = Segment {
            text: String::new(),
            duration_seconds: None,
            start_time_seconds: 0,
            note_ranges: Vec::new(),
        };
        assert_eq!(segment.line_count(), 1);

        let segment = Segment {
            text: "one\ntwo\nthree".to_string(),
            ..segment
        };
        assert_eq!(segment.line_count(), 3);
    }
}
