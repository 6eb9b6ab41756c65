//! Word progress mapping
//!
//! Converts elapsed time and pace into the discrete reading cursor and the
//! continuous highlight progress used for per-word fading.
//!
//! ## Fade
//! Each word fades in over the two words ahead of the cursor:
//! `alpha(i) = 0.3 + 0.7 * smoothstep(-2.0, 0.0, progress - i)`.
//! Words already passed stay fully opaque. Note words never fade.

use crate::script::Word;

/// Opacity of words well ahead of the cursor
pub const WORD_ALPHA_FLOOR: f64 = 0.3;

/// Fade window start, in words relative to the cursor
pub const FADE_WINDOW_START: f64 = -2.0;

/// Fade window end, in words relative to the cursor
pub const FADE_WINDOW_END: f64 = 0.0;

/// Absorbs float error when elapsed time was derived from a word index
const INDEX_EPSILON: f64 = 1e-9;

/// Hermite interpolation between two edges
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Index of the word under the reading cursor
///
/// `min(floor(elapsed * wpm / 60), total_words - 1)`, floored at 0.
/// `words_per_minute` must be positive (validated by settings).
pub fn current_word_index(
    elapsed_seconds: f64,
    total_words: usize,
    words_per_minute: u32,
) -> usize {
    if total_words == 0 || !elapsed_seconds.is_finite() || elapsed_seconds <= 0.0 {
        return 0;
    }

    let position = elapsed_seconds * f64::from(words_per_minute) / 60.0;
    let index = (position + INDEX_EPSILON).floor() as usize;
    index.min(total_words - 1)
}

/// Elapsed time at which the cursor reaches `index`
pub fn elapsed_for_word(index: usize, words_per_minute: u32) -> f64 {
    index as f64 * 60.0 / f64::from(words_per_minute)
}

/// Continuous cursor position in words
///
/// Returns negative infinity before playback has started so that no word is
/// highlighted before the first tick.
pub fn highlight_progress(elapsed_seconds: f64, words_per_minute: u32, is_playing: bool) -> f64 {
    if elapsed_seconds == 0.0 && !is_playing {
        return f64::NEG_INFINITY;
    }
    elapsed_seconds * (f64::from(words_per_minute) / 60.0)
}

/// Opacity of the word at `index` for a given highlight progress
pub fn word_alpha(index: usize, highlight_progress: f64) -> f64 {
    let fade = smoothstep(
        FADE_WINDOW_START,
        FADE_WINDOW_END,
        highlight_progress - index as f64,
    );
    WORD_ALPHA_FLOOR + (1.0 - WORD_ALPHA_FLOOR) * fade
}

/// How a renderer should draw a word
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WordStyle {
    /// Note words: fixed accent style, never faded
    Accent,
    /// Regular words with their current opacity
    Faded(f64),
}

pub fn word_style(word: &Word, index: usize, highlight_progress: f64) -> WordStyle {
    if word.is_note {
        WordStyle::Accent
    } else {
        WordStyle::Faded(word_alpha(index, highlight_progress))
    }
}

/// Styles for every word of a script
pub fn word_styles(words: &[Word], highlight_progress: f64) -> Vec<WordStyle> {
    words
        .iter()
        .enumerate()
        .map(|(i, word)| word_style(word, i, highlight_progress))
        .collect()
}
