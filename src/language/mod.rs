//! Language identification for extracted document text.
//!
//! # Architecture
//!
//! ```text
//! raw text ──▶ LanguageClassifier::classify()
//!                 │  first N chars, trimmed
//!                 ▼
//!           LanguageDetector::detect()   (trait; StatisticalDetector by default,
//!                 │             ScriptDetector as its fallback)
//!                 │  "ru" / "en" / "el" / …  or DetectError
//!                 ▼
//!           code → Language mapping + UnsupportedLanguagePolicy
//!                 │
//!                 ▼
//!              Language
//! ```
//!
//! The classifier never fails: an empty sample, a detector error or an
//! unsupported code all resolve to a [`Language`] and are logged.
//!
//! # Quick start
//!
//! ```rust
//! use pdf_to_audio::language::{Language, LanguageClassifier};
//!
//! let classifier = LanguageClassifier::default();
//! assert_eq!(classifier.classify("Привет! Мы вчера были в театре и смотрели новый спектакль."), Language::Russian);
//! assert_eq!(classifier.classify(""), Language::English);
//! ```

pub mod classifier;
pub mod detector;
pub mod statistical;
pub mod types;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use classifier::{Classification, LanguageClassifier, UnsupportedLanguagePolicy};
pub use detector::{DetectError, LanguageDetector, ScriptDetector};
pub use statistical::StatisticalDetector;
pub use types::{Language, ParseLanguageError};
