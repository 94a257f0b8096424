//! Core speech-synthesizer trait and shared types.
//!
//! # Overview
//!
//! [`SpeechSynthesizer`] is the interface the converter drives.  It is
//! object-safe and `Send` so it can be held behind a
//! `Box<dyn SpeechSynthesizer>` owned by the [`Converter`].
//!
//! [`EspeakSynthesizer`](super::EspeakSynthesizer) is the production
//! implementation.  [`MockSynthesizer`] (available under `#[cfg(test)]`)
//! records calls and writes placeholder bytes, for testing the pipeline
//! without a speech engine installed.
//!
//! [`Converter`]: crate::pipeline::Converter

use std::path::Path;

use thiserror::Error;

// ---------------------------------------------------------------------------
// SynthError
// ---------------------------------------------------------------------------

/// All errors that can arise from a speech synthesizer.
#[derive(Debug, Clone, Error)]
pub enum SynthError {
    /// The engine cannot be reached at all (binary missing, session failed).
    #[error("speech engine unavailable: {0}")]
    Unavailable(String),

    /// The engine is reachable but its voice list could not be read.
    #[error("cannot enumerate voices: {0}")]
    VoiceList(String),

    /// The engine rejected the requested voice.
    #[error("unsupported voice: {0}")]
    UnsupportedVoice(String),

    /// Reading or writing the output file failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// The engine ran but reported a failure.
    #[error("synthesis failed: {0}")]
    Engine(String),
}

impl From<std::io::Error> for SynthError {
    fn from(e: std::io::Error) -> Self {
        SynthError::Io(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// VoiceRecord / SpeechSettings
// ---------------------------------------------------------------------------

/// A voice as reported by the engine, before language classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceRecord {
    /// Engine-specific handle passed back to [`SpeechSynthesizer::select_voice`].
    pub id: String,
    /// Human-readable name.
    pub name: String,
}

impl VoiceRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Speaking rate and loudness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechSettings {
    /// Words per minute.
    pub rate: u32,
    /// Loudness in `0.0 ..= 1.0`.
    pub volume: f32,
}

impl SpeechSettings {
    pub fn new(rate: u32, volume: f32) -> Self {
        Self {
            rate,
            volume: volume.clamp(0.0, 1.0),
        }
    }
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            rate: 150,
            volume: 0.9,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Object-safe interface for text-to-speech engines.
///
/// # Contract
///
/// - `select_voice(None)` means "use your own default voice".
/// - `synthesize_to_file` writes a complete audio file at `output`; the
///   parent directory already exists.
/// - `shutdown` releases the engine session.  It is called exactly once, by
///   the owner, and no other method is called afterwards.
pub trait SpeechSynthesizer: Send {
    /// List the voices the engine offers, in engine order.
    fn voices(&self) -> Result<Vec<VoiceRecord>, SynthError>;

    /// Apply rate and volume to subsequent synthesis.
    fn configure(&mut self, settings: SpeechSettings) -> Result<(), SynthError>;

    /// Choose the voice for subsequent synthesis.
    fn select_voice(&mut self, voice_id: Option<&str>) -> Result<(), SynthError>;

    /// Speak `text` into the file at `output`.
    fn synthesize_to_file(&mut self, text: &str, output: &Path) -> Result<(), SynthError>;

    /// Release the engine session.
    fn shutdown(&mut self) {}
}

// Compile-time assertion: Box<dyn SpeechSynthesizer> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechSynthesizer>) {}
};

// ---------------------------------------------------------------------------
// MockSynthesizer  (test-only)
// ---------------------------------------------------------------------------

/// One call observed by [`MockSynthesizer`].
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SynthCall {
    Configure(SpeechSettings),
    SelectVoice(Option<String>),
    Synthesize { text: String, output: std::path::PathBuf },
    Shutdown,
}

/// A test double that records every call into a shared log and writes a
/// small placeholder file on synthesis.
#[cfg(test)]
pub(crate) struct MockSynthesizer {
    voices: Result<Vec<VoiceRecord>, SynthError>,
    fail_synthesis: Option<SynthError>,
    rejected_voice: Option<String>,
    selected: Option<String>,
    log: std::sync::Arc<std::sync::Mutex<Vec<SynthCall>>>,
}

#[cfg(test)]
impl MockSynthesizer {
    pub(crate) fn with_voices(voices: Vec<VoiceRecord>) -> Self {
        Self {
            voices: Ok(voices),
            fail_synthesis: None,
            rejected_voice: None,
            selected: None,
            log: Default::default(),
        }
    }

    pub(crate) fn voice_list_error(error: SynthError) -> Self {
        Self {
            voices: Err(error),
            fail_synthesis: None,
            rejected_voice: None,
            selected: None,
            log: Default::default(),
        }
    }

    pub(crate) fn failing(mut self, error: SynthError) -> Self {
        self.fail_synthesis = Some(error);
        self
    }

    /// Fail synthesis with [`SynthError::UnsupportedVoice`] while `voice_id`
    /// is selected, like an engine that only validates voices when speaking.
    pub(crate) fn rejecting_voice(mut self, voice_id: &str) -> Self {
        self.rejected_voice = Some(voice_id.to_string());
        self
    }

    /// Handle to the call log; stays valid after the mock is moved.
    pub(crate) fn log(&self) -> std::sync::Arc<std::sync::Mutex<Vec<SynthCall>>> {
        std::sync::Arc::clone(&self.log)
    }

    fn record(&self, call: SynthCall) {
        self.log.lock().unwrap().push(call);
    }
}

#[cfg(test)]
impl SpeechSynthesizer for MockSynthesizer {
    fn voices(&self) -> Result<Vec<VoiceRecord>, SynthError> {
        self.voices.clone()
    }

    fn configure(&mut self, settings: SpeechSettings) -> Result<(), SynthError> {
        self.record(SynthCall::Configure(settings));
        Ok(())
    }

    fn select_voice(&mut self, voice_id: Option<&str>) -> Result<(), SynthError> {
        self.record(SynthCall::SelectVoice(voice_id.map(str::to_string)));
        self.selected = voice_id.map(str::to_string);
        Ok(())
    }

    fn synthesize_to_file(&mut self, text: &str, output: &Path) -> Result<(), SynthError> {
        self.record(SynthCall::Synthesize {
            text: text.to_string(),
            output: output.to_path_buf(),
        });
        if let Some(err) = &self.fail_synthesis {
            return Err(err.clone());
        }
        if self.rejected_voice.is_some() && self.selected == self.rejected_voice {
            return Err(SynthError::UnsupportedVoice(format!(
                "voice {} not available",
                self.selected.as_deref().unwrap_or_default()
            )));
        }
        std::fs::write(output, format!("AUDIO:{text}"))?;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.record(SynthCall::Shutdown);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn settings_clamp_volume() {
        assert_eq!(SpeechSettings::new(150, 1.7).volume, 1.0);
        assert_eq!(SpeechSettings::new(150, -0.2).volume, 0.0);
        assert_eq!(SpeechSettings::new(200, 0.5).rate, 200);
    }

    #[test]
    fn default_settings_match_classic_engine_defaults() {
        let s = SpeechSettings::default();
        assert_eq!(s.rate, 150);
        assert!((s.volume - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn mock_writes_output_and_records_calls() {
        let dir = tempdir().expect("temp dir");
        let out = dir.path().join("a.wav");
        let mut synth = MockSynthesizer::with_voices(vec![]);
        let log = synth.log();

        synth.select_voice(Some("ru")).unwrap();
        synth.synthesize_to_file("hi", &out).unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "AUDIO:hi");
        let calls = log.lock().unwrap();
        assert_eq!(calls[0], SynthCall::SelectVoice(Some("ru".into())));
        assert!(matches!(calls[1], SynthCall::Synthesize { .. }));
    }

    #[test]
    fn mock_failing_does_not_write() {
        let dir = tempdir().expect("temp dir");
        let out = dir.path().join("a.wav");
        let mut synth =
            MockSynthesizer::with_voices(vec![]).failing(SynthError::Engine("boom".into()));
        assert!(synth.synthesize_to_file("hi", &out).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn io_error_converts() {
        let e: SynthError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(e, SynthError::Io(_)));
        assert!(e.to_string().contains("gone"));
    }

    #[test]
    fn box_dyn_synthesizer_compiles() {
        let synth: Box<dyn SpeechSynthesizer> = Box::new(MockSynthesizer::with_voices(vec![
            VoiceRecord::new("en", "English"),
        ]));
        assert_eq!(synth.voices().unwrap().len(), 1);
    }
}
