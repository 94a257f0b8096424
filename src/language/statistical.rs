//! Statistical language identification backed by `whatlang`.
//!
//! `whatlang` scores trigram profiles and reports a confidence.  Reliable
//! guesses are returned as ISO-639-1 codes where one exists (ISO-639-3
//! otherwise); unreliable or missing guesses defer to [`ScriptDetector`].

use whatlang::Lang;

use super::detector::{DetectError, LanguageDetector, ScriptDetector};

/// Default detector: `whatlang` first, Unicode-script counting second.
///
/// # Example
/// ```rust
/// use pdf_to_audio::language::{LanguageDetector, StatisticalDetector};
///
/// let detector = StatisticalDetector::new();
/// let text = "Die Geschichte dieser kleinen Stadt beginnt im Mittelalter. \
///             Damals lebten hier nur wenige Familien, die von der Landwirtschaft \
///             und dem Handel mit den Nachbardörfern lebten.";
/// assert_eq!(detector.detect(text).unwrap(), "de");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticalDetector {
    fallback: ScriptDetector,
}

impl StatisticalDetector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LanguageDetector for StatisticalDetector {
    fn detect(&self, sample: &str) -> Result<String, DetectError> {
        if !sample.chars().any(char::is_alphabetic) {
            return Err(DetectError::NoFeatures);
        }

        match whatlang::detect(sample) {
            Some(info) if info.is_reliable() => {
                log::debug!(
                    "language: whatlang → {} (confidence {:.2})",
                    info.lang().code(),
                    info.confidence()
                );
                Ok(iso_code(info.lang()).to_string())
            }
            Some(info) => {
                log::debug!(
                    "language: unreliable whatlang guess {} ({:.2}); counting scripts",
                    info.lang().code(),
                    info.confidence()
                );
                self.fallback.detect(sample)
            }
            None => self.fallback.detect(sample),
        }
    }
}

/// Two-letter code for `lang` where one exists, else `whatlang`'s own code.
fn iso_code(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Rus => "ru",
        Lang::Ukr => "uk",
        Lang::Bel => "be",
        Lang::Bul => "bg",
        Lang::Srp => "sr",
        Lang::Mkd => "mk",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Spa => "es",
        Lang::Por => "pt",
        Lang::Ita => "it",
        Lang::Nld => "nl",
        Lang::Pol => "pl",
        Lang::Ces => "cs",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Fin => "fi",
        Lang::Tur => "tr",
        Lang::Ell => "el",
        Lang::Heb => "he",
        Lang::Ara => "ar",
        Lang::Hin => "hi",
        Lang::Tha => "th",
        Lang::Jpn => "ja",
        Lang::Cmn => "zh",
        Lang::Kor => "ko",
        other => other.code(),
    }
}
