//! Conversion pipeline for PDF-to-Audio.
//!
//! This module wires document extraction, language classification, text
//! normalization, voice selection and speech synthesis into a single
//! [`Converter`], and reports per-document [`ConversionResult`]s and
//! per-folder [`BatchSummary`]s.
//!
//! # Architecture
//!
//! ```text
//! Converter::new(synth, extractor, classifier, settings)
//!        │
//!        ├─ VoiceCatalog::discover(synth)      ← once per session
//!        └─ synth.configure(settings)
//!
//! Converter::process_folder(dir)
//!        │
//!        └─ for each *.pdf (sorted)
//!              │
//!              ▼
//!        Converter::process_document(path)
//!              ├─ DocumentExtractor::extract    → Extracted
//!              ├─ LanguageClassifier::classify  → Classified
//!              ├─ text::normalize               → Cleaned
//!              ├─ voice::select_voice           → VoiceSelected
//!              └─ synth.synthesize_to_file      → Synthesized
//!
//! Drop(Converter) ──▶ synth.shutdown()          ← exactly once
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use pdf_to_audio::config::AppConfig;
//! use pdf_to_audio::pipeline::{BatchOptions, Converter};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let mut converter = Converter::from_config(&config)?;
//!
//!     let summary = converter.process_folder(Path::new("books"), &BatchOptions::default())?;
//!     println!("{}/{} converted", summary.success_count, summary.total_count);
//!     Ok(())
//! }
//! ```

pub mod result;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use result::{
    BatchFailure, BatchSummary, ConversionError, ConversionReport, ConversionResult,
    ConverterError, Degradation,
};
pub use runner::{output_file_name, BatchOptions, ConvertOptions, Converter, OUTPUT_SUFFIX};
pub use state::ConversionStage;
