//! Text normalization for speech synthesis.
//!
//! * [`normalize`] — raw extracted text → one clean, speakable line.
//! * [`surviving_lines`] / [`keep_line`] — the page-number / debris filter.
//! * [`SymbolTable`] — per-language spoken words for `•`, `→` and `—`.

pub mod normalize;
pub mod symbols;

pub use normalize::{keep_line, normalize, surviving_lines, MIN_LINE_CHARS};
pub use symbols::{SymbolClass, SymbolTable};
