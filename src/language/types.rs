//! The closed set of languages the converter routes voices for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// A language the pipeline knows how to clean text for and pick voices for.
///
/// Produced only by [`LanguageClassifier`](super::LanguageClassifier) or by an
/// explicit override.  Serialised in lowercase (`"english"`, `"russian"`,
/// `"unknown"`) so it reads naturally in `settings.toml` and JSON reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Russian,
    /// Detected or requested, but outside the supported set.
    Unknown,
}

impl Language {
    /// All variants, in declaration order.
    pub const ALL: [Language; 3] = [Language::English, Language::Russian, Language::Unknown];

    /// Lowercase name used in logs, file names and config.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Russian => "russian",
            Language::Unknown => "unknown",
        }
    }

    /// Map a detector code (ISO-639-1 with an optional region suffix) onto a
    /// supported language.  Returns `None` for codes outside the set.
    ///
    /// ```
    /// use pdf_to_audio::language::Language;
    ///
    /// assert_eq!(Language::from_code("ru"), Some(Language::Russian));
    /// assert_eq!(Language::from_code("en-GB"), Some(Language::English));
    /// assert_eq!(Language::from_code("de"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Language> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ru" => Some(Language::Russian),
            "en" | "en-us" | "en-gb" => Some(Language::English),
            _ => None,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Parsing (CLI / config overrides)
// ---------------------------------------------------------------------------

/// Returned when a language override string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised language '{0}' (expected english/en, russian/ru or unknown)")]
pub struct ParseLanguageError(pub String);

impl FromStr for Language {
    type Err = ParseLanguageError;

    /// Accepts full names and short codes, case-insensitively.
    ///
    /// ```
    /// use pdf_to_audio::language::Language;
    ///
    /// assert_eq!("Russian".parse::<Language>().unwrap(), Language::Russian);
    /// assert_eq!("en".parse::<Language>().unwrap(), Language::English);
    /// assert!("klingon".parse::<Language>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "russian" | "ru" => Ok(Language::Russian),
            "unknown" => Ok(Language::Unknown),
            _ => Err(ParseLanguageError(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
