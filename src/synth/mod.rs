//! Speech synthesis module.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │          SpeechSynthesizer (trait)            │
//! │                                               │
//! │  voices() ──▶ Vec<VoiceRecord>                │
//! │  configure(SpeechSettings)                    │
//! │  select_voice(Some(id) | None = default)      │
//! │  synthesize_to_file(text, path)               │
//! │  shutdown()                                   │
//! │                                               │
//! │        ┌───────────────────┐                  │
//! │        │ EspeakSynthesizer │ espeak-ng CLI    │
//! │        └───────────────────┘                  │
//! └───────────────────────────────────────────────┘
//! ```

pub mod engine;
pub mod espeak;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{SpeechSettings, SpeechSynthesizer, SynthError, VoiceRecord};
pub use espeak::{parse_voice_list, EspeakSynthesizer};

#[cfg(test)]
pub(crate) use engine::{MockSynthesizer, SynthCall};
