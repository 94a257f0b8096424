//! Per-document conversion state machine.
//!
//! ```text
//! Pending ──extract──▶ Extracted ──classify / override──▶ Classified
//!         ──normalize (optional)──▶ Cleaned ──select──▶ VoiceSelected
//!         ──synthesize──▶ Synthesized
//! any stage ──error──▶ ConversionResult::Failed { stage, .. }
//! ```
//!
//! A failed result records the last stage the document reached.

use serde::Serialize;

/// Stages a single document passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversionStage {
    /// Nothing done yet.
    Pending,
    /// Page text has been read.
    Extracted,
    /// The language is known.
    Classified,
    /// Text is ready for speech (normalized, or passed through unchanged).
    Cleaned,
    /// A voice (or the engine default) has been chosen.
    VoiceSelected,
    /// The audio file has been written.
    Synthesized,
}

impl ConversionStage {
    /// The stage that follows this one, or `None` at the end.
    pub fn next(&self) -> Option<ConversionStage> {
        match self {
            ConversionStage::Pending => Some(ConversionStage::Extracted),
            ConversionStage::Extracted => Some(ConversionStage::Classified),
            ConversionStage::Classified => Some(ConversionStage::Cleaned),
            ConversionStage::Cleaned => Some(ConversionStage::VoiceSelected),
            ConversionStage::VoiceSelected => Some(ConversionStage::Synthesized),
            ConversionStage::Synthesized => None,
        }
    }

    /// `true` once the document has finished successfully.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversionStage::Synthesized)
    }

    /// A short human-readable label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            ConversionStage::Pending => "Pending",
            ConversionStage::Extracted => "Extracted",
            ConversionStage::Classified => "Classified",
            ConversionStage::Cleaned => "Cleaned",
            ConversionStage::VoiceSelected => "Voice selected",
            ConversionStage::Synthesized => "Synthesized",
        }
    }
}

impl Default for ConversionStage {
    fn default() -> Self {
        ConversionStage::Pending
    }
}

/// Tracks one document's progress and logs each transition.
#[derive(Debug, Default)]
pub(crate) struct StageTracker {
    stage: ConversionStage,
}

impl StageTracker {
    pub(crate) fn stage(&self) -> ConversionStage {
        self.stage
    }

    /// Move to the next stage.
    pub(crate) fn advance(&mut self) {
        if let Some(next) = self.stage.next() {
            log::debug!("pipeline: {} → {}", self.stage.label(), next.label());
            self.stage = next;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
