//! Conversion outcomes, error kinds and batch summaries.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::language::Language;
use crate::synth::SynthError;

use super::state::ConversionStage;

// ---------------------------------------------------------------------------
// ConversionError
// ---------------------------------------------------------------------------

/// Why a single document failed.  None of these abort a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The input path does not exist.
    #[error("input not found: {0}")]
    InputNotFound(PathBuf),

    /// The document could not be read, or contained no text.
    #[error("text extraction failed: {0}")]
    ExtractionFailed(String),

    /// Nothing speakable was left after cleaning.
    #[error("no text to convert")]
    EmptyText,

    /// The engine failed to produce the output file.
    #[error("audio synthesis failed: {0}")]
    SynthesisFailed(String),

    /// The converter's engine session was already shut down.
    #[error("speech engine session is closed")]
    EngineClosed,
}

/// A non-fatal condition absorbed on the way to a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Degradation {
    /// Detection was impossible or unsupported; a default language was used.
    ClassificationDegraded { detected_code: Option<String> },
    /// No catalogued voice for the language; the engine default was used.
    VoiceUnavailable { language: Language },
}

// ---------------------------------------------------------------------------
// ConversionResult
// ---------------------------------------------------------------------------

/// Details of a successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub language: Language,
    /// Display name of the voice used.
    pub voice: String,
    /// Size of the written audio file.
    pub bytes: u64,
    pub degradations: Vec<Degradation>,
}

impl ConversionReport {
    /// File size in mebibytes.
    pub fn size_mb(&self) -> f64 {
        self.bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Terminal outcome of one document.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    Converted(ConversionReport),
    Failed {
        input: PathBuf,
        /// Last stage reached before the failure.
        stage: ConversionStage,
        error: ConversionError,
    },
}

impl ConversionResult {
    pub(crate) fn failed(input: &Path, stage: ConversionStage, error: ConversionError) -> Self {
        log::error!("pipeline: {} failed at {}: {error}", input.display(), stage.label());
        ConversionResult::Failed {
            input: input.to_path_buf(),
            stage,
            error,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Converted(_))
    }

    pub fn report(&self) -> Option<&ConversionReport> {
        match self {
            ConversionResult::Converted(report) => Some(report),
            ConversionResult::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ConversionError> {
        match self {
            ConversionResult::Converted(_) => None,
            ConversionResult::Failed { error, .. } => Some(error),
        }
    }

    /// Language used, for successful conversions only.
    pub fn language(&self) -> Option<Language> {
        self.report().map(|r| r.language)
    }

    pub fn input(&self) -> &Path {
        match self {
            ConversionResult::Converted(report) => &report.input,
            ConversionResult::Failed { input, .. } => input,
        }
    }
}

// ---------------------------------------------------------------------------
// ConverterError
// ---------------------------------------------------------------------------

/// Failures that stop the converter as a whole.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// The speech engine cannot be reached; no document could be converted.
    #[error("speech engine unavailable: {0}")]
    Engine(#[from] SynthError),

    /// The converter's engine session was already shut down.
    #[error("speech engine session is closed")]
    Closed,

    /// The batch input directory could not be listed.
    #[error("cannot read input directory {path}: {source}")]
    InputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// BatchSummary
// ---------------------------------------------------------------------------

/// One failed document in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub input: PathBuf,
    pub stage: ConversionStage,
    pub error: String,
}

/// Aggregate outcome of a folder run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub success_count: usize,
    pub total_count: usize,
    /// Successful conversions per language used.
    pub per_language: BTreeMap<Language, usize>,
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    /// Fold one document's result into the counters.
    pub fn record(&mut self, result: &ConversionResult) {
        self.total_count += 1;
        match result {
            ConversionResult::Converted(report) => {
                self.success_count += 1;
                *self.per_language.entry(report.language).or_insert(0) += 1;
            }
            ConversionResult::Failed {
                input,
                stage,
                error,
            } => self.failures.push(BatchFailure {
                input: input.clone(),
                stage: *stage,
                error: error.to_string(),
            }),
        }
    }

    pub fn failure_count(&self) -> usize {
        self.total_count - self.success_count
    }

    /// Write the summary as pretty JSON.
    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
