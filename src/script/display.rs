//! Display text builder
//!
//! Produces the text the reader actually sees: `[note content]` becomes
//! `content`, `[time mm:ss]` disappears, everything else passes through
//! byte-for-byte. Note ranges and words are expressed against the output.

use super::markers::{TokenKind, tokenize};
use super::types::{DisplayTextResult, TextRange, Word};

/// Build display text and note ranges from raw script text
pub fn build_display_text(raw: &str) -> DisplayTextResult {
    let mut result = DisplayTextResult {
        text: String::with_capacity(raw.len()),
        note_ranges: Vec::new(),
    };

    for token in tokenize(raw) {
        match token.kind {
            TokenKind::Text => result.text.push_str(&raw[token.range]),
            TokenKind::Time { .. } => {}
            TokenKind::Note { content } => {
                let start = result.text.len();
                result.text.push_str(&raw[content]);
                let range = TextRange::new(start, result.text.len());
                if !range.is_empty() {
                    result.note_ranges.push(range);
                }
            }
        }
    }

    result
}

impl DisplayTextResult {
    /// Trim surrounding whitespace, shifting and clipping note ranges
    pub fn trimmed(self) -> Self {
        let start = self.text.len() - self.text.trim_start().len();
        let end = self.text.trim_end().len().max(start);

        let note_ranges = self
            .note_ranges
            .into_iter()
            .filter_map(|range| {
                let clipped = TextRange::new(range.start.max(start), range.end.min(end));
                (!clipped.is_empty())
                    .then(|| TextRange::new(clipped.start - start, clipped.end - start))
            })
            .collect();

        Self {
            text: self.text[start..end].to_string(),
            note_ranges,
        }
    }

    /// Whether the byte range lies entirely inside one note
    pub fn is_inside_note(&self, range: &TextRange) -> bool {
        is_inside_any(&self.note_ranges, range)
    }
}

fn is_inside_any(note_ranges: &[TextRange], range: &TextRange) -> bool {
    // Ranges are ordered: find the last note starting at or before `range`
    let idx = note_ranges.partition_point(|note| note.start <= range.start);
    idx > 0 && note_ranges[idx - 1].contains_range(range)
}

/// Split display text into words (maximal non-whitespace runs)
pub fn extract_words(display: &DisplayTextResult) -> Vec<Word> {
    let text = display.text.as_str();
    let mut words = Vec::new();
    let mut word_start: Option<usize> = None;

    let mut push_word = |start: usize, end: usize| {
        let range = TextRange::new(start, end);
        words.push(Word {
            text: text[start..end].to_string(),
            start_index: start,
            end_index: end,
            is_note: is_inside_any(&display.note_ranges, &range),
        });
    };

    for (idx, ch) in text.char_indices() {
        match (ch.is_whitespace(), word_start) {
            (true, Some(start)) => {
                push_word(start, idx);
                word_start = None;
            }
            (false, None) => word_start = Some(idx),
            _ => {}
        }
    }

    if let Some(start) = word_start {
        push_word(start, text.len());
    }

    words
}
