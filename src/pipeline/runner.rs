//! Conversion orchestrator: drives extract → classify → clean → voice →
//! synthesize for one document, and loops it over a folder.
//!
//! [`Converter`] owns the speech engine for its whole lifetime: the engine is
//! configured and its voices catalogued once in [`Converter::new`], reused
//! for every document, and shut down exactly once when the converter is
//! dropped.
//!
//! # Pipeline flow
//!
//! ```text
//! process_document(path)
//!   ├─ path missing?              → Failed(InputNotFound)       [Pending]
//!   ├─ extractor.extract          → Failed(ExtractionFailed)    [Pending]
//!   ├─ force_language | classify                                [Classified]
//!   ├─ normalize (if clean_text)                                [Cleaned]
//!   ├─ select_voice(catalog)      → engine default if none      [VoiceSelected]
//!   ├─ empty text?                → Failed(EmptyText)
//!   ├─ mkdir -p output dir, synthesize_to_file
//!   │                             → Failed(SynthesisFailed)
//!   └─ stat output                → Converted { bytes, … }      [Synthesized]
//! ```

use std::path::{Path, PathBuf};

use crate::config::{AppConfig, AudioFormat, ConversionConfig};
use crate::extract::{DocumentExtractor, PdfExtractor};
use crate::language::{Language, LanguageClassifier};
use crate::synth::{EspeakSynthesizer, SpeechSettings, SpeechSynthesizer, SynthError};
use crate::text::normalize;
use crate::voice::{select_voice, VoiceCatalog, VoiceChoice};

use super::result::{
    BatchSummary, ConversionError, ConversionReport, ConversionResult, ConverterError, Degradation,
};
use super::state::StageTracker;

/// Suffix appended to the input stem for derived output names.
pub const OUTPUT_SUFFIX: &str = "_output";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Per-document options.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Explicit output file.  `None` derives `<stem>_output.<format>`.
    pub output_path: Option<PathBuf>,
    /// Directory for derived output names.  `None` uses the working directory.
    pub output_dir: Option<PathBuf>,
    pub format: AudioFormat,
    /// Normalize the text before synthesis.
    pub clean_text: bool,
    /// Skip detection and use this language.
    pub force_language: Option<Language>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_path: None,
            output_dir: None,
            format: AudioFormat::default(),
            clean_text: true,
            force_language: None,
        }
    }
}

impl ConvertOptions {
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self {
            output_path: None,
            output_dir: config.output_dir.clone(),
            format: config.audio_format,
            clean_text: config.clean_text,
            force_language: config.force_language,
        }
    }

    /// Where the audio for `input` will be written.
    pub fn resolve_output(&self, input: &Path) -> PathBuf {
        if let Some(path) = &self.output_path {
            return path.clone();
        }
        let name = output_file_name(input, self.format);
        match &self.output_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}

/// Folder-run options.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Destination directory.  `None` writes next to the inputs.
    pub output_dir: Option<PathBuf>,
    pub format: AudioFormat,
    /// Speaking rate for this run.  `None` keeps the converter's rate.
    pub rate: Option<u32>,
    pub clean_text: bool,
    /// Skip detection and read every document in this language.
    pub force_language: Option<Language>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            output_dir: None,
            format: AudioFormat::default(),
            rate: None,
            clean_text: true,
            force_language: None,
        }
    }
}

/// `<stem>_output.<ext>` for `input`.
pub fn output_file_name(input: &Path, format: AudioFormat) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    format!("{stem}{OUTPUT_SUFFIX}.{}", format.extension())
}

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// Owns the engine session, voice catalog and language classifier.
///
/// ```rust,no_run
/// use std::path::Path;
/// use pdf_to_audio::config::AppConfig;
/// use pdf_to_audio::pipeline::{ConvertOptions, Converter};
///
/// let config = AppConfig::default();
/// let mut converter = Converter::from_config(&config).expect("espeak-ng not installed");
/// let result = converter.process_document(Path::new("book.pdf"), &ConvertOptions::default());
/// println!("success: {}", result.is_success());
/// ```
pub struct Converter {
    synth: Box<dyn SpeechSynthesizer>,
    extractor: Box<dyn DocumentExtractor>,
    classifier: LanguageClassifier,
    catalog: VoiceCatalog,
    settings: SpeechSettings,
    closed: bool,
}

impl Converter {
    /// Acquire the engine session: catalogue its voices and apply `settings`.
    ///
    /// # Errors
    ///
    /// [`ConverterError::Engine`] when the engine cannot be reached.
    pub fn new(
        mut synth: Box<dyn SpeechSynthesizer>,
        extractor: Box<dyn DocumentExtractor>,
        classifier: LanguageClassifier,
        settings: SpeechSettings,
    ) -> Result<Self, ConverterError> {
        let catalog = VoiceCatalog::discover(synth.as_ref())?;

        if let Err(e) = synth.configure(settings) {
            log::warn!("pipeline: could not configure speech settings: {e}");
        }

        Ok(Self {
            synth,
            extractor,
            classifier,
            catalog,
            settings,
            closed: false,
        })
    }

    /// Production wiring: espeak-ng engine, lopdf extractor, whatlang detector.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConverterError> {
        let synth = EspeakSynthesizer::new(config.speech.engine_bin.as_deref())?;
        Self::new(
            Box::new(synth),
            Box::new(PdfExtractor::new()),
            config.language.classifier(),
            config.speech.settings(),
        )
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> SpeechSettings {
        self.settings
    }

    // -----------------------------------------------------------------------
    // Single document
    // -----------------------------------------------------------------------

    /// Convert one document.  Never panics or returns early with an error:
    /// every failure is reported inside the [`ConversionResult`].
    pub fn process_document(&mut self, path: &Path, options: &ConvertOptions) -> ConversionResult {
        let mut tracker = StageTracker::default();
        let mut degradations = Vec::new();

        // ── 1. Validate + extract ────────────────────────────────────────
        if self.closed {
            return ConversionResult::failed(path, tracker.stage(), ConversionError::EngineClosed);
        }
        if !path.exists() {
            return ConversionResult::failed(
                path,
                tracker.stage(),
                ConversionError::InputNotFound(path.to_path_buf()),
            );
        }

        log::info!("pipeline: extracting text from {}", path.display());
        let raw = match self.extractor.extract(path) {
            Ok(raw) if raw.is_blank() => {
                return ConversionResult::failed(
                    path,
                    tracker.stage(),
                    ConversionError::ExtractionFailed("document contains no text".into()),
                );
            }
            Ok(raw) => raw,
            Err(e) => {
                return ConversionResult::failed(
                    path,
                    tracker.stage(),
                    ConversionError::ExtractionFailed(e.to_string()),
                );
            }
        };
        let text = raw.joined();
        drop(raw);
        log::info!("pipeline: extracted {} characters", text.chars().count());
        tracker.advance();

        // ── 2. Language ──────────────────────────────────────────────────
        let language = match options.force_language {
            Some(language) => {
                log::info!("pipeline: using forced language {language}");
                language
            }
            None => {
                let classification = self.classifier.classify_detailed(&text);
                if classification.degraded {
                    degradations.push(Degradation::ClassificationDegraded {
                        detected_code: classification.detected_code.clone(),
                    });
                }
                log::info!("pipeline: detected language {}", classification.language);
                classification.language
            }
        };
        tracker.advance();

        // ── 3. Clean ─────────────────────────────────────────────────────
        let text = if options.clean_text {
            let cleaned = normalize(&text, language);
            log::info!("pipeline: cleaned text: {} characters", cleaned.chars().count());
            cleaned
        } else {
            text
        };
        tracker.advance();

        // ── 4. Voice ─────────────────────────────────────────────────────
        let choice = select_voice(language, &self.catalog);
        if choice.is_default() {
            log::warn!("pipeline: no {language} voice found, using engine default voice");
            degradations.push(Degradation::VoiceUnavailable { language });
        } else {
            log::info!("pipeline: using {language} voice: {}", choice.display_name());
        }
        let voice_name = choice.display_name().to_string();
        let voice_id = choice.voice_id().map(str::to_string);
        tracker.advance();

        // ── 5. Synthesize ────────────────────────────────────────────────
        if text.trim().is_empty() {
            return ConversionResult::failed(path, tracker.stage(), ConversionError::EmptyText);
        }

        let output = options.resolve_output(path);
        log::info!("pipeline: converting {language} text to {}", output.display());

        let bytes = match self.synthesize(&text, voice_id.as_deref(), &output, language, &mut degradations) {
            Ok(bytes) => bytes,
            Err(e) => return ConversionResult::failed(path, tracker.stage(), e),
        };
        tracker.advance();

        let report = ConversionReport {
            input: path.to_path_buf(),
            output,
            language,
            voice: voice_name,
            bytes,
            degradations,
        };
        log::info!(
            "pipeline: conversion completed: {} ({:.2} MB, {})",
            report.output.display(),
            report.size_mb(),
            report.language
        );
        ConversionResult::Converted(report)
    }

    /// Select the voice on the engine, write `output`, return its size.
    fn synthesize(
        &mut self,
        text: &str,
        voice_id: Option<&str>,
        output: &Path,
        language: Language,
        degradations: &mut Vec<Degradation>,
    ) -> Result<u64, ConversionError> {
        let mut voice_id = voice_id;
        if let Err(e) = self.synth.select_voice(voice_id) {
            if voice_id.is_none() {
                return Err(ConversionError::SynthesisFailed(e.to_string()));
            }
            log::warn!("pipeline: engine rejected voice ({e}); using engine default");
            self.use_engine_default(language, degradations)?;
            voice_id = None;
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConversionError::SynthesisFailed(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        match self.synth.synthesize_to_file(text, output) {
            Ok(()) => {}
            // Some engines only reject a voice once they start speaking.
            Err(SynthError::UnsupportedVoice(msg)) if voice_id.is_some() => {
                log::warn!("pipeline: engine rejected voice ({msg}); retrying with engine default");
                self.use_engine_default(language, degradations)?;
                self.synth
                    .synthesize_to_file(text, output)
                    .map_err(|e| ConversionError::SynthesisFailed(e.to_string()))?;
            }
            Err(e) => return Err(ConversionError::SynthesisFailed(e.to_string())),
        }

        std::fs::metadata(output)
            .map(|m| m.len())
            .map_err(|e| ConversionError::SynthesisFailed(format!("output not written: {e}")))
    }

    fn use_engine_default(
        &mut self,
        language: Language,
        degradations: &mut Vec<Degradation>,
    ) -> Result<(), ConversionError> {
        self.synth
            .select_voice(None)
            .map_err(|e| ConversionError::SynthesisFailed(e.to_string()))?;
        degradations.push(Degradation::VoiceUnavailable { language });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Folder
    // -----------------------------------------------------------------------

    /// Convert every `.pdf` directly inside `input_dir`, in path order.
    ///
    /// One document's failure never stops the run.
    ///
    /// # Errors
    ///
    /// [`ConverterError::InputDir`] when `input_dir` cannot be listed.
    pub fn process_folder(
        &mut self,
        input_dir: &Path,
        options: &BatchOptions,
    ) -> Result<BatchSummary, ConverterError> {
        if self.closed {
            return Err(ConverterError::Closed);
        }
        let documents = list_documents(input_dir)?;
        let output_dir = options
            .output_dir
            .clone()
            .unwrap_or_else(|| input_dir.to_path_buf());

        if let Some(rate) = options.rate {
            self.settings = SpeechSettings::new(rate, self.settings.volume);
            if let Err(e) = self.synth.configure(self.settings) {
                log::warn!("pipeline: could not apply rate {rate}: {e}");
            }
        }

        log::info!(
            "pipeline: found {} PDF files in {}",
            documents.len(),
            input_dir.display()
        );

        let mut summary = BatchSummary::default();
        for (i, path) in documents.iter().enumerate() {
            log::info!("pipeline: [{}/{}] {}", i + 1, documents.len(), path.display());
            let doc_options = ConvertOptions {
                output_path: Some(output_dir.join(output_file_name(path, options.format))),
                output_dir: None,
                format: options.format,
                clean_text: options.clean_text,
                force_language: options.force_language,
            };
            let result = self.process_document(path, &doc_options);
            summary.record(&result);
        }

        log::info!(
            "pipeline: batch finished: {}/{} converted",
            summary.success_count,
            summary.total_count
        );
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Teardown
    // -----------------------------------------------------------------------

    /// Release the engine session.  Idempotent; also runs on drop.
    pub fn shutdown(&mut self) {
        if !self.closed {
            self.synth.shutdown();
            self.closed = true;
        }
    }
}

impl Drop for Converter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Regular `.pdf` files (any case) directly inside `dir`, sorted.
fn list_documents(dir: &Path) -> Result<Vec<PathBuf>, ConverterError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ConverterError::InputDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut documents: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    documents.sort();
    Ok(documents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::extract::MockExtractor;
    use crate::language::UnsupportedLanguagePolicy;
    use crate::pipeline::ConversionStage;
    use crate::synth::{MockSynthesizer, SynthCall, SynthError, VoiceRecord};

    const ENGLISH_TEXT: &str = "Chapter One\n\n1\nIt was a bright cold day in April.";
    const RUSSIAN_TEXT: &str =
        "Глава первая\n\n1\nБыл холодный ясный апрельский день, и часы пробили тринадцать.";

    type CallLog = Arc<Mutex<Vec<SynthCall>>>;

    fn voices() -> Vec<VoiceRecord> {
        vec![
            VoiceRecord::new("af", "Afrikaans"),
            VoiceRecord::new("en-us", "English (America)"),
            VoiceRecord::new("ru", "Russian"),
        ]
    }

    fn converter_with(synth: MockSynthesizer, extractor: MockExtractor) -> (Converter, CallLog) {
        let log = synth.log();
        let converter = Converter::new(
            Box::new(synth),
            Box::new(extractor),
            LanguageClassifier::default(),
            SpeechSettings::default(),
        )
        .expect("converter");
        (converter, log)
    }

    /// Create empty placeholder files; the mock extractor serves their text.
    fn touch(dir: &TempDir, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                std::fs::write(&path, b"%PDF-placeholder").unwrap();
                path
            })
            .collect()
    }

    fn synthesize_calls(log: &CallLog) -> Vec<(String, PathBuf)> {
        log.lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                SynthCall::Synthesize { text, output } => Some((text.clone(), output.clone())),
                _ => None,
            })
            .collect()
    }

    fn selected_voices(log: &CallLog) -> Vec<Option<String>> {
        log.lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                SynthCall::SelectVoice(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    fn options_in(dir: &Path) -> ConvertOptions {
        ConvertOptions {
            output_dir: Some(dir.to_path_buf()),
            ..ConvertOptions::default()
        }
    }

    // --- construction / teardown ---

    #[test]
    fn construction_configures_engine() {
        let (_converter, log) =
            converter_with(MockSynthesizer::with_voices(voices()), MockExtractor::default());
        assert_eq!(
            log.lock().unwrap()[0],
            SynthCall::Configure(SpeechSettings::default())
        );
    }

    #[test]
    fn unreachable_engine_fails_construction() {
        let synth = MockSynthesizer::voice_list_error(SynthError::Unavailable("no engine".into()));
        let result = Converter::new(
            Box::new(synth),
            Box::new(MockExtractor::default()),
            LanguageClassifier::default(),
            SpeechSettings::default(),
        );
        assert!(matches!(result, Err(ConverterError::Engine(_))));
    }

    #[test]
    fn unreadable_voice_list_still_converts() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["a.pdf"]);
        let synth = MockSynthesizer::voice_list_error(SynthError::VoiceList("garbled".into()));
        let (mut converter, log) =
            converter_with(synth, MockExtractor::default().with("a.pdf", &[ENGLISH_TEXT]));

        assert!(converter.catalog().is_synthetic());
        let result = converter.process_document(&inputs[0], &options_in(dir.path()));
        assert!(result.is_success());
        assert_eq!(selected_voices(&log), vec![None]);
    }

    #[test]
    fn shutdown_runs_once_on_drop() {
        let (mut converter, log) =
            converter_with(MockSynthesizer::with_voices(voices()), MockExtractor::default());
        converter.shutdown();
        drop(converter);
        let shutdowns = log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == SynthCall::Shutdown)
            .count();
        assert_eq!(shutdowns, 1);
    }

    #[test]
    fn closed_converter_does_not_touch_engine() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["a.pdf"]);
        let (mut converter, log) = converter_with(
            MockSynthesizer::with_voices(voices()),
            MockExtractor::default().with("a.pdf", &[ENGLISH_TEXT]),
        );
        converter.shutdown();
        let calls_before = log.lock().unwrap().len();

        let result = converter.process_document(&inputs[0], &options_in(dir.path()));
        assert_eq!(result.error(), Some(&ConversionError::EngineClosed));
        assert!(matches!(
            converter.process_folder(dir.path(), &BatchOptions::default()),
            Err(ConverterError::Closed)
        ));
        assert_eq!(log.lock().unwrap().len(), calls_before);
    }

    // --- failure paths ---

    #[test]
    fn missing_input_fails_without_writes() {
        let dir = tempdir().expect("temp dir");
        let out_dir = dir.path().join("out");
        let (mut converter, log) =
            converter_with(MockSynthesizer::with_voices(voices()), MockExtractor::default());

        let result = converter.process_document(&dir.path().join("missing.pdf"), &options_in(&out_dir));

        assert!(matches!(
            result,
            ConversionResult::Failed {
                stage: ConversionStage::Pending,
                error: ConversionError::InputNotFound(_),
                ..
            }
        ));
        assert!(!out_dir.exists());
        assert!(synthesize_calls(&log).is_empty());
    }

    #[test]
    fn blank_extraction_fails_without_synthesis() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["blank.pdf"]);
        let (mut converter, log) = converter_with(
            MockSynthesizer::with_voices(voices()),
            MockExtractor::default().with("blank.pdf", &["", "  \n"]),
        );

        let result = converter.process_document(&inputs[0], &options_in(dir.path()));

        assert!(matches!(result.error(), Some(ConversionError::ExtractionFailed(_))));
        assert!(synthesize_calls(&log).is_empty());
        assert!(selected_voices(&log).is_empty());
    }

    #[test]
    fn corrupt_document_fails_extraction() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["corrupt.pdf"]);
        let (mut converter, _log) =
            converter_with(MockSynthesizer::with_voices(voices()), MockExtractor::default());

        let result = converter.process_document(&inputs[0], &options_in(dir.path()));
        assert!(matches!(result.error(), Some(ConversionError::ExtractionFailed(_))));
    }

    #[test]
    fn text_cleaned_to_nothing_fails_before_engine() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["numbers.pdf"]);
        let (mut converter, log) = converter_with(
            MockSynthesizer::with_voices(voices()),
            MockExtractor::default().with("numbers.pdf", &["12\n\n345\nab"]),
        );

        let result = converter.process_document(&inputs[0], &options_in(dir.path()));

        assert!(matches!(
            result,
            ConversionResult::Failed {
                stage: ConversionStage::VoiceSelected,
                error: ConversionError::EmptyText,
                ..
            }
        ));
        assert!(synthesize_calls(&log).is_empty());
    }

    #[test]
    fn engine_failure_is_reported_not_raised() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["a.pdf"]);
        let synth =
            MockSynthesizer::with_voices(voices()).failing(SynthError::Io("disk full".into()));
        let (mut converter, _log) =
            converter_with(synth, MockExtractor::default().with("a.pdf", &[ENGLISH_TEXT]));

        let result = converter.process_document(&inputs[0], &options_in(dir.path()));
        match result.error() {
            Some(ConversionError::SynthesisFailed(msg)) => assert!(msg.contains("disk full")),
            other => panic!("expected SynthesisFailed, got {other:?}"),
        }
    }

    // --- success paths ---

    #[test]
    fn english_document_end_to_end() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["novel.pdf"]);
        let out_dir = dir.path().join("audio").join("nested");
        let (mut converter, log) = converter_with(
            MockSynthesizer::with_voices(voices()),
            MockExtractor::default().with("novel.pdf", &[ENGLISH_TEXT]),
        );

        let result = converter.process_document(&inputs[0], &options_in(&out_dir));
        let report = result.report().expect("converted");

        assert_eq!(report.language, Language::English);
        assert_eq!(report.voice, "English (America)");
        assert_eq!(report.output, out_dir.join("novel_output.mp3"));
        assert!(report.output.exists());
        assert_eq!(report.bytes, std::fs::metadata(&report.output).unwrap().len());
        assert!(report.degradations.is_empty());

        assert_eq!(selected_voices(&log), vec![Some("en-us".to_string())]);
        let (text, _) = &synthesize_calls(&log)[0];
        assert_eq!(text, "Chapter One It was a bright cold day in April.");
    }

    #[test]
    fn russian_document_uses_russian_voice_and_words() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["kniga.pdf"]);
        let (mut converter, log) = converter_with(
            MockSynthesizer::with_voices(voices()),
            MockExtractor::default().with("kniga.pdf", &[RUSSIAN_TEXT, "• пункт → итог"]),
        );

        let result = converter.process_document(&inputs[0], &options_in(dir.path()));
        assert_eq!(result.language(), Some(Language::Russian));
        assert_eq!(selected_voices(&log), vec![Some("ru".to_string())]);
        let (text, _) = &synthesize_calls(&log)[0];
        assert!(text.ends_with("маркер пункт стрелка итог"), "{text}");
    }

    #[test]
    fn forced_language_skips_detection() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["a.pdf"]);
        let (mut converter, log) = converter_with(
            MockSynthesizer::with_voices(voices()),
            MockExtractor::default().with("a.pdf", &[ENGLISH_TEXT]),
        );

        let options = ConvertOptions {
            force_language: Some(Language::Russian),
            ..options_in(dir.path())
        };
        let result = converter.process_document(&inputs[0], &options);
        assert_eq!(result.language(), Some(Language::Russian));
        assert_eq!(selected_voices(&log), vec![Some("ru".to_string())]);
    }

    #[test]
    fn missing_voice_uses_engine_default() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["a.pdf"]);
        let synth = MockSynthesizer::with_voices(vec![VoiceRecord::new("en", "English")]);
        let (mut converter, log) =
            converter_with(synth, MockExtractor::default().with("a.pdf", &[RUSSIAN_TEXT]));

        let result = converter.process_document(&inputs[0], &options_in(dir.path()));
        let report = result.report().expect("degraded but converted");
        assert_eq!(report.language, Language::Russian);
        assert_eq!(report.voice, "engine default");
        assert_eq!(
            report.degradations,
            vec![Degradation::VoiceUnavailable {
                language: Language::Russian
            }]
        );
        assert_eq!(selected_voices(&log), vec![None]);
    }

    #[test]
    fn voice_rejected_while_speaking_retries_with_default() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["kniga.pdf"]);
        let synth = MockSynthesizer::with_voices(voices()).rejecting_voice("ru");
        let (mut converter, log) =
            converter_with(synth, MockExtractor::default().with("kniga.pdf", &[RUSSIAN_TEXT]));

        let result = converter.process_document(&inputs[0], &options_in(dir.path()));
        let report = result.report().expect("converted with engine default");
        assert!(report.output.exists());
        assert_eq!(
            report.degradations,
            vec![Degradation::VoiceUnavailable {
                language: Language::Russian
            }]
        );
        assert_eq!(selected_voices(&log), vec![Some("ru".to_string()), None]);
        assert_eq!(synthesize_calls(&log).len(), 2);
    }

    #[test]
    fn unsupported_language_is_flagged_as_degraded() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["greek.pdf"]);
        let (mut converter, _log) = converter_with(
            MockSynthesizer::with_voices(voices()),
            MockExtractor::default().with("greek.pdf", &["Καλημέρα κόσμε, τι κάνεις;"]),
        );

        let result = converter.process_document(&inputs[0], &options_in(dir.path()));
        let report = result.report().expect("converted");
        assert_eq!(report.language, Language::English);
        assert_eq!(
            report.degradations,
            vec![Degradation::ClassificationDegraded {
                detected_code: Some("el".into())
            }]
        );
    }

    #[test]
    fn unknown_policy_routes_to_engine_default() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["greek.pdf"]);
        let synth = MockSynthesizer::with_voices(voices());
        let log = synth.log();
        let mut converter = Converter::new(
            Box::new(synth),
            Box::new(MockExtractor::default().with("greek.pdf", &["Καλημέρα κόσμε"])),
            LanguageClassifier::default().with_policy(UnsupportedLanguagePolicy::Unknown),
            SpeechSettings::default(),
        )
        .unwrap();

        let result = converter.process_document(&inputs[0], &options_in(dir.path()));
        assert_eq!(result.language(), Some(Language::Unknown));
        assert_eq!(selected_voices(&log), vec![None]);
    }

    #[test]
    fn clean_flag_off_passes_raw_text() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["a.pdf"]);
        let (mut converter, log) = converter_with(
            MockSynthesizer::with_voices(voices()),
            MockExtractor::default().with("a.pdf", &[ENGLISH_TEXT]),
        );

        let options = ConvertOptions {
            clean_text: false,
            ..options_in(dir.path())
        };
        assert!(converter.process_document(&inputs[0], &options).is_success());
        let (text, _) = &synthesize_calls(&log)[0];
        assert_eq!(text, &format!("{ENGLISH_TEXT}\n\n"));
    }

    #[test]
    fn explicit_output_path_wins() {
        let dir = tempdir().expect("temp dir");
        let inputs = touch(&dir, &["a.pdf"]);
        let explicit = dir.path().join("book.wav");
        let (mut converter, _log) = converter_with(
            MockSynthesizer::with_voices(voices()),
            MockExtractor::default().with("a.pdf", &[ENGLISH_TEXT]),
        );

        let options = ConvertOptions {
            output_path: Some(explicit.clone()),
            ..options_in(&dir.path().join("ignored"))
        };
        let result = converter.process_document(&inputs[0], &options);
        assert_eq!(result.report().unwrap().output, explicit);
    }

    // --- naming ---

    #[test]
    fn output_name_uses_stem_and_format() {
        assert_eq!(output_file_name(Path::new("/x/Report.v2.pdf"), AudioFormat::Wav), "Report.v2_output.wav");
        assert_eq!(output_file_name(Path::new("doc.PDF"), AudioFormat::Mp3), "doc_output.mp3");
    }

    #[test]
    fn options_without_dir_resolve_relative() {
        let options = ConvertOptions::default();
        assert_eq!(options.resolve_output(Path::new("/a/b/c.pdf")), PathBuf::from("c_output.mp3"));
    }

    // --- batch ---

    #[test]
    fn batch_counts_per_language() {
        let dir = tempdir().expect("temp dir");
        touch(&dir, &["a.pdf", "b.pdf", "c.pdf"]);
        let extractor = MockExtractor::default()
            .with("a.pdf", &[ENGLISH_TEXT])
            .with("b.pdf", &["A second English book about the sea."])
            .with("c.pdf", &[RUSSIAN_TEXT]);
        let (mut converter, _log) = converter_with(MockSynthesizer::with_voices(voices()), extractor);

        let out_dir = dir.path().join("out");
        let summary = converter
            .process_folder(
                dir.path(),
                &BatchOptions {
                    output_dir: Some(out_dir.clone()),
                    ..BatchOptions::default()
                },
            )
            .expect("batch");

        assert_eq!(summary.success_count, 3);
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.per_language.get(&Language::English), Some(&2));
        assert_eq!(summary.per_language.get(&Language::Russian), Some(&1));
        assert!(out_dir.join("c_output.mp3").exists());
    }

    #[test]
    fn batch_continues_after_failure() {
        let dir = tempdir().expect("temp dir");
        touch(&dir, &["a.pdf", "broken.pdf", "c.pdf"]);
        let extractor = MockExtractor::default()
            .with("a.pdf", &[ENGLISH_TEXT])
            .with("c.pdf", &[RUSSIAN_TEXT]);
        let (mut converter, _log) = converter_with(MockSynthesizer::with_voices(voices()), extractor);

        let summary = converter
            .process_folder(dir.path(), &BatchOptions::default())
            .expect("batch");

        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].input.ends_with("broken.pdf"));
        // Outputs default to the input directory.
        assert!(dir.path().join("a_output.mp3").exists());
    }

    #[test]
    fn batch_only_picks_pdf_files_in_order() {
        let dir = tempdir().expect("temp dir");
        touch(&dir, &["b.PDF", "a.pdf", "notes.txt", "c.pdfx"]);
        std::fs::create_dir(dir.path().join("sub.pdf")).unwrap();
        let extractor = MockExtractor::default()
            .with("a.pdf", &[ENGLISH_TEXT])
            .with("b.PDF", &[ENGLISH_TEXT]);
        let (mut converter, log) = converter_with(MockSynthesizer::with_voices(voices()), extractor);

        let summary = converter
            .process_folder(dir.path(), &BatchOptions::default())
            .expect("batch");

        assert_eq!(summary.total_count, 2);
        let outputs: Vec<PathBuf> = synthesize_calls(&log).into_iter().map(|(_, o)| o).collect();
        assert_eq!(
            outputs,
            vec![dir.path().join("a_output.mp3"), dir.path().join("b_output.mp3")]
        );
    }

    #[test]
    fn batch_applies_rate() {
        let dir = tempdir().expect("temp dir");
        let (mut converter, log) =
            converter_with(MockSynthesizer::with_voices(voices()), MockExtractor::default());

        let options = BatchOptions {
            rate: Some(200),
            ..BatchOptions::default()
        };
        let summary = converter.process_folder(dir.path(), &options).expect("batch");

        assert_eq!(summary.total_count, 0);
        assert_eq!(converter.settings().rate, 200);
        assert!(log
            .lock()
            .unwrap()
            .contains(&SynthCall::Configure(SpeechSettings::new(200, 0.9))));
    }

    #[test]
    fn batch_forced_language_applies_to_every_document() {
        let dir = tempdir().expect("temp dir");
        touch(&dir, &["a.pdf", "b.pdf"]);
        let extractor = MockExtractor::default()
            .with("a.pdf", &[ENGLISH_TEXT])
            .with("b.pdf", &[RUSSIAN_TEXT]);
        let (mut converter, log) = converter_with(MockSynthesizer::with_voices(voices()), extractor);

        let options = BatchOptions {
            force_language: Some(Language::Russian),
            ..BatchOptions::default()
        };
        let summary = converter.process_folder(dir.path(), &options).expect("batch");

        assert_eq!(summary.per_language.get(&Language::Russian), Some(&2));
        assert_eq!(
            selected_voices(&log),
            vec![Some("ru".to_string()), Some("ru".to_string())]
        );
    }

    #[test]
    fn batch_on_missing_dir_is_an_error() {
        let (mut converter, _log) =
            converter_with(MockSynthesizer::with_voices(voices()), MockExtractor::default());
        let result = converter.process_folder(Path::new("/nonexistent/dir"), &BatchOptions::default());
        assert!(matches!(result, Err(ConverterError::InputDir { .. })));
    }
}
