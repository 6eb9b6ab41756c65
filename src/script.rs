//! Script module - annotated script parsing
//!
//! - `markers`: shared `[time mm:ss]` / `[note ...]` grammar and tokenizer
//! - `parser`: splits a script into raw segments at time markers
//! - `display`: display text, note ranges and words
//! - `segments`: segment table and the session content snapshot

pub mod display;
pub mod markers;
pub mod parser;
pub mod segments;
mod types;

pub use display::{build_display_text, extract_words};
pub use markers::{Token, TokenKind, format_notes_markup, tokenize};
pub use parser::{ParsedScript, parse};
pub use segments::{build_content, build_segment_table};
pub use types::*;
