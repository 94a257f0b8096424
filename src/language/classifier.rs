//! Adapter from a raw [`LanguageDetector`] onto the closed [`Language`] set.
//!
//! The adapter owns three decisions:
//!
//! 1. **Sampling** — only the first `sample_chars` characters are inspected.
//! 2. **Defaulting** — an empty sample or a detector error yields
//!    [`Language::English`].
//! 3. **Coercion** — codes outside the supported set are resolved by an
//!    [`UnsupportedLanguagePolicy`] (English by default).

use serde::{Deserialize, Serialize};

use super::detector::LanguageDetector;
use super::statistical::StatisticalDetector;
use super::types::Language;

/// Number of leading characters handed to the detector.
pub const DEFAULT_SAMPLE_CHARS: usize = 1000;

// ---------------------------------------------------------------------------
// UnsupportedLanguagePolicy
// ---------------------------------------------------------------------------

/// What to do when the detector reports a language outside the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnsupportedLanguagePolicy {
    /// Route the document to English voices (the historical behaviour).
    FallbackEnglish,
    /// Report [`Language::Unknown`]; voice selection then uses the engine
    /// default voice.
    Unknown,
}

impl Default for UnsupportedLanguagePolicy {
    fn default() -> Self {
        Self::FallbackEnglish
    }
}

impl UnsupportedLanguagePolicy {
    fn resolve(&self) -> Language {
        match self {
            Self::FallbackEnglish => Language::English,
            Self::Unknown => Language::Unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Detailed outcome of a classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The language the pipeline will use.
    pub language: Language,
    /// Raw code reported by the detector, if it produced one.
    pub detected_code: Option<String>,
    /// `true` when a default was applied instead of a direct mapping.
    pub degraded: bool,
}

impl Classification {
    fn direct(language: Language, code: String) -> Self {
        Self {
            language,
            detected_code: Some(code),
            degraded: false,
        }
    }

    fn defaulted(language: Language, code: Option<String>) -> Self {
        Self {
            language,
            detected_code: code,
            degraded: true,
        }
    }
}

// ---------------------------------------------------------------------------
// LanguageClassifier
// ---------------------------------------------------------------------------

/// Never-failing language classifier.
///
/// # Example
/// ```rust
/// use pdf_to_audio::language::{Language, LanguageClassifier, ScriptDetector,
///                              UnsupportedLanguagePolicy};
///
/// let strict = LanguageClassifier::new(Box::new(ScriptDetector::new()))
///     .with_policy(UnsupportedLanguagePolicy::Unknown);
/// assert_eq!(strict.classify("Καλημέρα κόσμε"), Language::Unknown);
///
/// let lenient = LanguageClassifier::default();
/// assert_eq!(lenient.classify("Καλημέρα κόσμε"), Language::English);
/// ```
pub struct LanguageClassifier {
    detector: Box<dyn LanguageDetector>,
    policy: UnsupportedLanguagePolicy,
    sample_chars: usize,
}

impl std::fmt::Debug for LanguageClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageClassifier")
            .field("policy", &self.policy)
            .field("sample_chars", &self.sample_chars)
            .finish_non_exhaustive()
    }
}

impl LanguageClassifier {
    /// Wrap `detector` with the default policy and sample size.
    pub fn new(detector: Box<dyn LanguageDetector>) -> Self {
        Self {
            detector,
            policy: UnsupportedLanguagePolicy::default(),
            sample_chars: DEFAULT_SAMPLE_CHARS,
        }
    }

    pub fn with_policy(mut self, policy: UnsupportedLanguagePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the sample size.  Zero is treated as one character.
    pub fn with_sample_chars(mut self, sample_chars: usize) -> Self {
        self.sample_chars = sample_chars.max(1);
        self
    }

    pub fn policy(&self) -> UnsupportedLanguagePolicy {
        self.policy
    }

    /// Classify `text` into a supported [`Language`].  Never fails.
    pub fn classify(&self, text: &str) -> Language {
        self.classify_detailed(text).language
    }

    /// Classify `text`, reporting whether a default had to be applied.
    pub fn classify_detailed(&self, text: &str) -> Classification {
        let sample = self.sample(text);

        if sample.is_empty() {
            log::debug!("language: empty sample, assuming english");
            return Classification::defaulted(Language::English, None);
        }

        match self.detector.detect(&sample) {
            Ok(code) => match Language::from_code(&code) {
                Some(language) => Classification::direct(language, code),
                None => {
                    let language = self.policy.resolve();
                    log::warn!("language: detected unsupported code '{code}', using {language}");
                    Classification::defaulted(language, Some(code))
                }
            },
            Err(e) => {
                log::warn!("language: detection failed ({e}), defaulting to english");
                Classification::defaulted(Language::English, None)
            }
        }
    }

    /// First `sample_chars` characters of `text`, trimmed.
    fn sample(&self, text: &str) -> String {
        let end = text
            .char_indices()
            .nth(self.sample_chars)
            .map_or(text.len(), |(idx, _)| idx);
        text[..end].trim().to_string()
    }
}

impl Default for LanguageClassifier {
    fn default() -> Self {
        Self::new(Box::new(StatisticalDetector::new()))
    }
}

// ---------------------------------------------------------------------------
// FixedDetector  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured detection result and records
/// the last sample it was given.
#[cfg(test)]
pub(crate) struct FixedDetector {
    response: Result<String, super::DetectError>,
    last_sample: std::sync::Mutex<Option<String>>,
}

#[cfg(test)]
impl FixedDetector {
    pub(crate) fn ok(code: &str) -> Self {
        Self {
            response: Ok(code.to_string()),
            last_sample: std::sync::Mutex::new(None),
        }
    }

    pub(crate) fn err(error: super::DetectError) -> Self {
        Self {
            response: Err(error),
            last_sample: std::sync::Mutex::new(None),
        }
    }
}

#[cfg(test)]
impl LanguageDetector for FixedDetector {
    fn detect(&self, sample: &str) -> Result<String, super::DetectError> {
        *self.last_sample.lock().unwrap() = Some(sample.to_string());
        self.response.clone()
    }
}

#[cfg(test)]
impl LanguageDetector for std::sync::Arc<FixedDetector> {
    fn detect(&self, sample: &str) -> Result<String, super::DetectError> {
        self.as_ref().detect(sample)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::language::DetectError;

    fn with_code(code: &str) -> LanguageClassifier {
        LanguageClassifier::new(Box::new(FixedDetector::ok(code)))
    }

    // --- empty / whitespace samples ---

    #[test]
    fn empty_text_is_english() {
        assert_eq!(LanguageClassifier::default().classify(""), Language::English);
    }

    #[test]
    fn whitespace_text_is_english() {
        assert_eq!(LanguageClassifier::default().classify("   "), Language::English);
        assert_eq!(LanguageClassifier::default().classify("\n\t \n"), Language::English);
    }

    #[test]
    fn empty_sample_does_not_call_detector() {
        let detector = Arc::new(FixedDetector::ok("ru"));
        let classifier = LanguageClassifier::new(Box::new(Arc::clone(&detector)));
        assert_eq!(classifier.classify("    "), Language::English);
        assert!(detector.last_sample.lock().unwrap().is_none());
    }

    // --- code mapping ---

    #[test]
    fn russian_code_maps_to_russian() {
        assert_eq!(with_code("ru").classify("текст"), Language::Russian);
    }

    #[test]
    fn english_codes_map_to_english() {
        for code in ["en", "en-us", "en-gb"] {
            let c = with_code(code).classify_detailed("text");
            assert_eq!(c.language, Language::English, "code {code}");
            assert!(!c.degraded);
        }
    }

    #[test]
    fn unsupported_code_falls_back_to_english_by_default() {
        let c = with_code("de").classify_detailed("Guten Tag");
        assert_eq!(c.language, Language::English);
        assert_eq!(c.detected_code.as_deref(), Some("de"));
        assert!(c.degraded);
    }

    #[test]
    fn unsupported_code_with_unknown_policy() {
        let classifier = with_code("fr").with_policy(UnsupportedLanguagePolicy::Unknown);
        assert_eq!(classifier.classify("Bonjour"), Language::Unknown);
    }

    // --- detector failure ---

    #[test]
    fn detector_error_defaults_to_english() {
        let classifier =
            LanguageClassifier::new(Box::new(FixedDetector::err(DetectError::Backend("boom".into()))));
        let c = classifier.classify_detailed("anything");
        assert_eq!(c.language, Language::English);
        assert!(c.degraded);
        assert!(c.detected_code.is_none());
    }

    #[test]
    fn detector_error_ignores_unknown_policy() {
        let classifier = LanguageClassifier::new(Box::new(FixedDetector::err(DetectError::NoFeatures)))
            .with_policy(UnsupportedLanguagePolicy::Unknown);
        assert_eq!(classifier.classify("1234"), Language::English);
    }

    // --- sampling ---

    #[test]
    fn sample_is_limited_to_first_thousand_chars() {
        let detector = Arc::new(FixedDetector::ok("en"));
        let classifier = LanguageClassifier::new(Box::new(Arc::clone(&detector)));
        let text = "я".repeat(1500);
        classifier.classify(&text);
        let sample = detector.last_sample.lock().unwrap().clone().unwrap();
        assert_eq!(sample.chars().count(), DEFAULT_SAMPLE_CHARS);
    }

    #[test]
    fn sample_is_trimmed() {
        let detector = Arc::new(FixedDetector::ok("en"));
        let classifier = LanguageClassifier::new(Box::new(Arc::clone(&detector))).with_sample_chars(8);
        classifier.classify("   abc   defghijk");
        let sample = detector.last_sample.lock().unwrap().clone().unwrap();
        assert_eq!(sample, "abc");
    }

    #[test]
    fn russian_text_beyond_sample_is_ignored() {
        let english = "The quick brown fox jumps over the lazy dog near the river bank. ";
        let text = format!("{}{}", english.repeat(20), "привет ".repeat(500));
        assert_eq!(LanguageClassifier::default().classify(&text), Language::English);
    }

    // --- default detector end to end ---

    #[test]
    fn default_classifier_detects_russian_text() {
        let text = "Глава первая. Это был тёмный и бурный вечер.";
        assert_eq!(LanguageClassifier::default().classify(text), Language::Russian);
    }

    #[test]
    fn default_classifier_coerces_greek_to_english() {
        assert_eq!(LanguageClassifier::default().classify("Καλημέρα κόσμε"), Language::English);
    }

    #[test]
    fn french_text_is_unknown_under_unknown_policy() {
        let text = "Bonjour tout le monde, comment allez-vous aujourd'hui ? Je voudrais \
                    vous présenter mon nouveau livre sur l'histoire de la France. Il raconte \
                    la vie quotidienne des paysans pendant le Moyen Âge.";
        let c = LanguageClassifier::default()
            .with_policy(UnsupportedLanguagePolicy::Unknown)
            .classify_detailed(text);
        assert_eq!(c.language, Language::Unknown);
        assert_eq!(c.detected_code.as_deref(), Some("fr"));
        assert!(c.degraded);
    }

    #[test]
    fn french_text_falls_back_to_english_by_default() {
        let text = "Il était une fois, dans un petit village au bord de la mer, une vieille \
                    femme qui vivait seule avec son chat. Chaque matin, elle allait au marché \
                    pour acheter du pain et des légumes frais.";
        let c = LanguageClassifier::default().classify_detailed(text);
        assert_eq!(c.language, Language::English);
        assert!(c.degraded);
    }
}
