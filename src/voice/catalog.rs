//! Voices grouped by language, built once per converter.
//!
//! Each engine voice lands in exactly one bucket.  [`VOICE_RULES`] is
//! evaluated top to bottom against the lowercased name and id; the first
//! rule with a matching marker wins, and voices no rule claims go to the
//! `other` bucket.

use std::collections::BTreeMap;

use crate::language::Language;
use crate::synth::{SpeechSynthesizer, SynthError, VoiceRecord};

// ---------------------------------------------------------------------------
// VoiceDescriptor
// ---------------------------------------------------------------------------

/// A discovered voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceDescriptor {
    /// Engine handle; `None` for the synthetic "engine default" entry.
    pub id: Option<String>,
    pub name: String,
    /// Position in the engine's voice list.
    pub index: usize,
}

impl VoiceDescriptor {
    fn synthetic_default() -> Self {
        Self {
            id: None,
            name: "Default".into(),
            index: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Marker rules
// ---------------------------------------------------------------------------

/// One ordered classification rule.  A voice matches when any marker is a
/// substring of its lowercased name or id.
pub struct VoiceRule {
    pub language: Language,
    pub markers: &'static [&'static str],
}

/// Rules in priority order: Russian is checked before English.
pub static VOICE_RULES: &[VoiceRule] = &[
    VoiceRule {
        language: Language::Russian,
        markers: &["russian", "ru", "russia"],
    },
    VoiceRule {
        language: Language::English,
        markers: &["english", "en", "us", "uk", "american", "british"],
    },
];

/// Bucket for `record`, or `None` for the `other` bucket.
pub fn classify_voice(record: &VoiceRecord) -> Option<Language> {
    let name = record.name.to_lowercase();
    let id = record.id.to_lowercase();

    VOICE_RULES
        .iter()
        .find(|rule| {
            rule.markers
                .iter()
                .any(|m| name.contains(*m) || id.contains(*m))
        })
        .map(|rule| rule.language)
}

// ---------------------------------------------------------------------------
// VoiceCatalog
// ---------------------------------------------------------------------------

/// Read-only index of voices by language.
#[derive(Debug, Clone, Default)]
pub struct VoiceCatalog {
    buckets: BTreeMap<Language, Vec<VoiceDescriptor>>,
    other: Vec<VoiceDescriptor>,
    synthetic: bool,
}

impl VoiceCatalog {
    /// Classify `records` in order.
    pub fn build(records: &[VoiceRecord]) -> Self {
        let mut catalog = Self::default();

        for (index, record) in records.iter().enumerate() {
            let descriptor = VoiceDescriptor {
                id: Some(record.id.clone()),
                name: record.name.clone(),
                index,
            };
            match classify_voice(record) {
                Some(language) => catalog.buckets.entry(language).or_default().push(descriptor),
                None => catalog.other.push(descriptor),
            }
        }

        catalog
    }

    /// A catalog with one English entry standing for the engine default.
    pub fn fallback() -> Self {
        let mut buckets = BTreeMap::new();
        buckets.insert(Language::English, vec![VoiceDescriptor::synthetic_default()]);
        Self {
            buckets,
            other: Vec::new(),
            synthetic: true,
        }
    }

    /// Query `synth` for its voices and build the catalog.
    ///
    /// A voice list that cannot be read degrades to [`VoiceCatalog::fallback`].
    ///
    /// # Errors
    ///
    /// [`SynthError::Unavailable`] when the engine cannot be reached at all.
    pub fn discover(synth: &dyn SpeechSynthesizer) -> Result<Self, SynthError> {
        let catalog = match synth.voices() {
            Ok(records) => Self::build(&records),
            Err(SynthError::Unavailable(msg)) => return Err(SynthError::Unavailable(msg)),
            Err(e) => {
                log::warn!("voice: {e}; falling back to the engine default voice");
                Self::fallback()
            }
        };
        catalog.log_summary();
        Ok(catalog)
    }

    /// Voices for `language`, in discovery order.
    pub fn voices_for(&self, language: Language) -> &[VoiceDescriptor] {
        self.buckets
            .get(&language)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Voices no rule claimed.
    pub fn other(&self) -> &[VoiceDescriptor] {
        &self.other
    }

    /// `true` when built by [`VoiceCatalog::fallback`].
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Total number of descriptors across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum::<usize>() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buckets as `(label, voices)` pairs: languages first, then `"other"`.
    pub fn groups(&self) -> Vec<(&'static str, &[VoiceDescriptor])> {
        let mut groups: Vec<(&'static str, &[VoiceDescriptor])> = self
            .buckets
            .iter()
            .map(|(language, voices)| (language.name(), voices.as_slice()))
            .collect();
        if !self.other.is_empty() {
            groups.push(("other", self.other.as_slice()));
        }
        groups
    }

    fn log_summary(&self) {
        log::info!("Available voices by language:");
        for (label, voices) in self.groups() {
            log::info!("  {} voices: {}", label.to_uppercase(), voices.len());
            for v in voices {
                log::debug!("    - {} (index {})", v.name, v.index);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
