//! Voice selection policy.

use crate::language::Language;

use super::catalog::{VoiceCatalog, VoiceDescriptor};

/// Outcome of [`select_voice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceChoice<'a> {
    /// A catalogued voice for the language.
    Voice(&'a VoiceDescriptor),
    /// No catalogued voice; let the engine use its own default.
    EngineDefault,
}

impl<'a> VoiceChoice<'a> {
    /// The id to hand to the engine; `None` means "engine default".
    pub fn voice_id(&self) -> Option<&'a str> {
        match self {
            VoiceChoice::Voice(v) => v.id.as_deref(),
            VoiceChoice::EngineDefault => None,
        }
    }

    /// Display name for logs and reports.
    pub fn display_name(&self) -> &'a str {
        match self {
            VoiceChoice::Voice(v) => v.name.as_str(),
            VoiceChoice::EngineDefault => "engine default",
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, VoiceChoice::EngineDefault)
    }
}

/// Pick the first catalogued voice for `language`, or signal the engine
/// default.  Deterministic: the same catalog always yields the same voice.
pub fn select_voice(language: Language, catalog: &VoiceCatalog) -> VoiceChoice<'_> {
    match catalog.voices_for(language).first() {
        Some(voice) => VoiceChoice::Voice(voice),
        None => VoiceChoice::EngineDefault,
    }
}
