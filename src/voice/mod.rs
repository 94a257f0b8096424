//! Voice catalog and selection.
//!
//! * [`VoiceCatalog`] — engine voices bucketed by language with ordered,
//!   first-match-wins marker rules ([`VOICE_RULES`]).
//! * [`select_voice`] — first voice for a language, or
//!   [`VoiceChoice::EngineDefault`].
//!
//! # Quick start
//!
//! ```rust
//! use pdf_to_audio::language::Language;
//! use pdf_to_audio::synth::VoiceRecord;
//! use pdf_to_audio::voice::{select_voice, VoiceCatalog};
//!
//! let catalog = VoiceCatalog::build(&[
//!     VoiceRecord::new("en-us", "English (America)"),
//!     VoiceRecord::new("ru", "Russian"),
//! ]);
//! assert_eq!(select_voice(Language::Russian, &catalog).voice_id(), Some("ru"));
//! ```

pub mod catalog;
pub mod selector;

pub use catalog::{classify_voice, VoiceCatalog, VoiceDescriptor, VoiceRule, VOICE_RULES};
pub use selector::{select_voice, VoiceChoice};
