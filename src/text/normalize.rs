//! Extracted-text cleanup.
//!
//! # Pipeline
//!
//! ```text
//! raw ──▶ collapse "\n\n…" runs to "\n"
//!     ──▶ split on "\n", squeeze inner whitespace, trim
//!     ──▶ drop lines shorter than 3 chars or made only of digits
//!     ──▶ join with " "
//!     ──▶ symbol substitution (language table)
//!     ──▶ final whitespace squeeze
//! ```
//!
//! Line filtering runs while newlines still delimit the page layout, so the
//! newline collapse must happen before any general whitespace collapse.

use crate::language::Language;

use super::symbols::SymbolTable;

/// Lines shorter than this (in characters, after trimming) are dropped.
pub const MIN_LINE_CHARS: usize = 3;

/// Clean `raw` into a single line of speakable text for `language`.
///
/// Output has no newlines, no runs of two or more spaces, and no leading or
/// trailing whitespace.  Empty input yields an empty string.
///
/// ```
/// use pdf_to_audio::language::Language;
/// use pdf_to_audio::text::normalize;
///
/// let raw = "Page 1\n\n1\nHello world.\n\nThis is a • test — done.";
/// assert_eq!(
///     normalize(raw, Language::English),
///     "Page 1 Hello world. This is a bullet point test - done."
/// );
/// ```
pub fn normalize(raw: &str, language: Language) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let joined = surviving_lines(raw).join(" ");
    let substituted = SymbolTable::for_language(language).apply(&joined);
    squeeze_whitespace(&substituted)
}

/// The lines that survive the length/digit filter, in order, each with its
/// internal whitespace squeezed to single spaces.
pub fn surviving_lines(raw: &str) -> Vec<String> {
    collapse_newlines(raw)
        .split('\n')
        .map(squeeze_whitespace)
        .filter(|line| keep_line(line))
        .collect()
}

/// `true` when `line` (already trimmed) is worth speaking.
///
/// Short fragments are usually page numbers, bullets or extraction debris;
/// lines made only of decimal digits are page numbers.  Other numerals
/// (`½`, `Ⅻ`) are not digits and are kept.
pub fn keep_line(line: &str) -> bool {
    if line.chars().count() < MIN_LINE_CHARS {
        return false;
    }
    !line.chars().all(|c| c.is_ascii_digit())
}

/// Replace each run of consecutive `'\n'` with a single `'\n'`.
fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_newline = false;
    for c in text.chars() {
        if c == '\n' {
            if !prev_newline {
                out.push('\n');
            }
            prev_newline = true;
        } else {
            out.push(c);
            prev_newline = false;
        }
    }
    out
}

/// Trim and collapse every whitespace run (including newlines) to one space.
fn squeeze_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
