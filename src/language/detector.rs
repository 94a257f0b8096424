//! Raw language detectors.
//!
//! [`LanguageDetector`] is the seam between the pipeline and whatever
//! statistical language-ID backend is available.  It returns a raw language
//! code; mapping codes onto [`Language`](super::Language) is the job of the
//! [`LanguageClassifier`](super::LanguageClassifier).
//!
//! [`ScriptDetector`] is the built-in backend: it scores the sample by
//! Unicode script and reports the code of the dominant script's primary
//! language.

use std::ops::RangeInclusive;

use thiserror::Error;

// ---------------------------------------------------------------------------
// DetectError
// ---------------------------------------------------------------------------

/// Errors a detector backend may report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectError {
    /// The sample contains nothing the detector can score (no letters).
    #[error("no features in text")]
    NoFeatures,

    /// Backend-internal failure.
    #[error("detector failure: {0}")]
    Backend(String),
}

// ---------------------------------------------------------------------------
// LanguageDetector trait
// ---------------------------------------------------------------------------

/// Object-safe interface for language-ID backends.
///
/// # Contract
///
/// - `sample` is already truncated and trimmed by the caller.
/// - Returns a lowercase ISO-639-1 code, optionally with a region suffix
///   (`"en-gb"`).
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of `sample` and return its code.
    fn detect(&self, sample: &str) -> Result<String, DetectError>;
}

// Compile-time assertion: Box<dyn LanguageDetector> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn LanguageDetector>) {}
};

// ---------------------------------------------------------------------------
// Script table
// ---------------------------------------------------------------------------

struct Script {
    code: &'static str,
    ranges: &'static [RangeInclusive<char>],
}

/// Scripts in tie-break priority order.
static SCRIPTS: &[Script] = &[
    Script {
        code: "en",
        ranges: &['A'..='Z', 'a'..='z', '\u{00C0}'..='\u{024F}'],
    },
    Script {
        code: "ru",
        ranges: &['\u{0400}'..='\u{04FF}', '\u{0500}'..='\u{052F}'],
    },
    Script {
        code: "el",
        ranges: &['\u{0370}'..='\u{03FF}'],
    },
    Script {
        code: "he",
        ranges: &['\u{0590}'..='\u{05FF}'],
    },
    Script {
        code: "ar",
        ranges: &['\u{0600}'..='\u{06FF}'],
    },
    Script {
        code: "hi",
        ranges: &['\u{0900}'..='\u{097F}'],
    },
    Script {
        code: "th",
        ranges: &['\u{0E01}'..='\u{0E5B}'],
    },
    Script {
        code: "ja",
        ranges: &['\u{3040}'..='\u{30FF}'],
    },
    Script {
        code: "zh",
        ranges: &['\u{4E00}'..='\u{9FFF}'],
    },
    Script {
        code: "ko",
        ranges: &['\u{AC00}'..='\u{D7AF}'],
    },
];

// ---------------------------------------------------------------------------
// ScriptDetector
// ---------------------------------------------------------------------------

/// Detects a language by counting letters per Unicode script.
///
/// The script with the most letters wins; ties go to the script listed
/// first (Latin, then Cyrillic, …).  Latin text is reported as `"en"` since
/// the detector cannot tell Latin-script languages apart.
///
/// # Example
/// ```rust
/// use pdf_to_audio::language::{LanguageDetector, ScriptDetector};
///
/// let detector = ScriptDetector::new();
/// assert_eq!(detector.detect("Добрый день").unwrap(), "ru");
/// assert_eq!(detector.detect("Good afternoon").unwrap(), "en");
/// assert!(detector.detect("12 345 --").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptDetector;

impl ScriptDetector {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageDetector for ScriptDetector {
    fn detect(&self, sample: &str) -> Result<String, DetectError> {
        let mut counts = vec![0usize; SCRIPTS.len()];

        for c in sample.chars().filter(|c| c.is_alphabetic()) {
            if let Some(idx) = SCRIPTS
                .iter()
                .position(|s| s.ranges.iter().any(|r| r.contains(&c)))
            {
                counts[idx] += 1;
            }
        }

        // Iterate in reverse so that `max_by_key` (which keeps the last
        // maximum) resolves ties in favour of the earlier table entry.
        counts
            .iter()
            .enumerate()
            .rev()
            .filter(|&(_, &n)| n > 0)
            .max_by_key(|&(_, &n)| n)
            .map(|(idx, _)| SCRIPTS[idx].code.to_string())
            .ok_or(DetectError::NoFeatures)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_russian() {
        let d = ScriptDetector::new();
        assert_eq!(d.detect("Съешь же ещё этих мягких французских булок").unwrap(), "ru");
    }

    #[test]
    fn detects_english() {
        let d = ScriptDetector::new();
        assert_eq!(d.detect("The quick brown fox jumps over the lazy dog").unwrap(), "en");
    }

    #[test]
    fn detects_other_scripts() {
        let d = ScriptDetector::new();
        assert_eq!(d.detect("Καλημέρα κόσμε").unwrap(), "el");
        assert_eq!(d.detect("สวัสดีครับ").unwrap(), "th");
        assert_eq!(d.detect("안녕하세요").unwrap(), "ko");
    }

    #[test]
    fn majority_script_wins_in_mixed_text() {
        let d = ScriptDetector::new();
        // Mostly Cyrillic with a Latin acronym.
        assert_eq!(d.detect("Протокол HTTP используется повсеместно").unwrap(), "ru");
    }

    #[test]
    fn tie_prefers_latin() {
        let d = ScriptDetector::new();
        assert_eq!(d.detect("ab жи").unwrap(), "en");
    }

    #[test]
    fn digits_and_punctuation_have_no_features() {
        let d = ScriptDetector::new();
        assert_eq!(d.detect("1234 — 5678 !!"), Err(DetectError::NoFeatures));
        assert_eq!(d.detect(""), Err(DetectError::NoFeatures));
    }

    #[test]
    fn box_dyn_detector_compiles() {
        let d: Box<dyn LanguageDetector> = Box::new(ScriptDetector::new());
        assert!(d.detect("hello").is_ok());
    }
}
