//! Marker grammar shared by the parser and the display text builder
//!
//! Two bracketed markers are recognized, case-insensitively:
//! - `[time mm:ss]` - control marker, sets the duration of the following text
//! - `[note content]` - inline note, shown as `content` in an accent style
//!
//! Both grammars live in one pattern so the parser and the display builder
//! always agree on what is a marker. Unterminated or malformed markers simply
//! fail to match and stay in the text as literals.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Combined marker pattern
///
/// Groups: 1 = minutes, 2 = seconds, 3 = note content.
static MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[time\s+(\d{1,2}):(\d{2})\]|\[note\s+([^\]]+)\]")
        .expect("marker pattern is valid")
});

/// Kind of a lexical token in a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Plain text run
    Text,
    /// `[time mm:ss]` with its value in seconds
    Time { seconds: u32 },
    /// `[note ...]` with the byte range of its content
    Note { content: Range<usize> },
}

/// A token with its byte range in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub range: Range<usize>,
}

fn marker_kind(caps: &Captures<'_>) -> TokenKind {
    if let Some(content) = caps.get(3) {
        return TokenKind::Note {
            content: content.range(),
        };
    }

    // Both groups are digit-only and at most two characters wide
    let minutes: u32 = caps.get(1).map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let seconds: u32 = caps.get(2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
    TokenKind::Time {
        seconds: minutes * 60 + seconds,
    }
}

/// Split text into plain runs and markers, left to right
///
/// Empty text runs are never emitted; concatenating every token's source
/// slice reproduces the input exactly.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last_end = 0;

    for caps in MARKER_PATTERN.captures_iter(text) {
        let Some(full) = caps.get(0) else { continue };

        if full.start() > last_end {
            tokens.push(Token {
                kind: TokenKind::Text,
                range: last_end..full.start(),
            });
        }

        tokens.push(Token {
            kind: marker_kind(&caps),
            range: full.range(),
        });
        last_end = full.end();
    }

    if last_end < text.len() {
        tokens.push(Token {
            kind: TokenKind::Text,
            range: last_end..text.len(),
        });
    }

    tokens
}

/// Remove `[time]` markers, leaving notes and plain text untouched
pub fn strip_time_markers(text: &str) -> String {
    MARKER_PATTERN
        .replace_all(text, |caps: &Captures<'_>| match caps.get(3) {
            Some(_) => caps[0].to_string(),
            None => String::new(),
        })
        .into_owned()
}

/// Format `[note content]` markers as `<note>content</note>` markup
///
/// For hosts that style notes through markup rather than ranges.
/// Time markers are left in place.
pub fn format_notes_markup(text: &str) -> String {
    MARKER_PATTERN
        .replace_all(text, |caps: &Captures<'_>| match caps.get(3) {
            Some(content) => format!("<note>{}</note>", content.as_str()),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_mixed() {
        let text = "Hi [time 01:05]there [note smile] end";
        let tokens = tokenize(text);

        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].kind, TokenKind::Text);
        assert_eq!(&text[tokens[0].range.clone()], "Hi ");
        assert_eq!(tokens[1].kind, TokenKind::Time { seconds: 65 });
        assert_eq!(&text[tokens[2].range.clone()], "there ");
        match &tokens[3].kind {
            TokenKind::Note { content } => assert_eq!(&text[content.clone()], "smile"),
            other => panic!("expected note, got {other:?}"),
        }
        assert_eq!(&text[tokens[4].range.clone()], " end");
    }

    #[test]
    fn test_tokens_cover_input() {
        let text = "[note a]b[TIME 0:07][Note  c d ]";
        let joined: String = tokenize(text)
            .iter()
            .map(|t| &text[t.range.clone()])
            .collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_case_insensitive() {
        let tokens = tokenize("[TiMe 2:30][NOTE x]");
        assert_eq!(tokens[0].kind, TokenKind::Time { seconds: 150 });
        assert!(matches!(tokens[1].kind, TokenKind::Note { .. }));
    }

    #[test]
    fn test_malformed_markers_are_text() {
        for text in [
            "[time 1:2]",
            "[time 123:00]",
            "[time 00:10",
            "[note unterminated",
            "[note]",
            "[timer 00:10]",
        ] {
            let tokens = tokenize(text);
            assert_eq!(tokens.len(), 1, "{text}");
            assert_eq!(tokens[0].kind, TokenKind::Text, "{text}");
        }
    }

    #[test]
    fn test_strip_time_markers() {
        assert_eq!(
            strip_time_markers("a [time 00:10]b [note c]"),
            "a b [note c]"
        );
    }

    #[test]
    fn test_format_notes_markup() {
        let text = "Hello [note smile] world [note pause]!";
        assert_eq!(
            format_notes_markup(text),
            "Hello <note>smile</note> world <note>pause</note>!"
        );
    }
}
