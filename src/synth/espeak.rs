//! `espeak-ng` command-line synthesizer.
//!
//! Voices come from `espeak-ng --voices`; synthesis runs
//! `espeak-ng -v <voice> -s <wpm> -a <amplitude> -w <out> --stdin` with the
//! text piped through stdin, so documents of any length avoid argv limits.
//!
//! The binary is resolved from an explicit path, then `ESPEAK_BIN`, then
//! `espeak-ng` / `espeak` on `PATH`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::engine::{SpeechSettings, SpeechSynthesizer, SynthError, VoiceRecord};

/// espeak's accepted speaking-rate range (words per minute).
const MIN_WPM: u32 = 80;
const MAX_WPM: u32 = 450;

/// Amplitude espeak uses at full configured volume (its own default).
const FULL_AMPLITUDE: f32 = 100.0;

// ---------------------------------------------------------------------------
// EspeakSynthesizer
// ---------------------------------------------------------------------------

/// Production synthesizer backed by the `espeak-ng` executable.
#[derive(Debug)]
pub struct EspeakSynthesizer {
    bin: PathBuf,
    settings: SpeechSettings,
    voice: Option<String>,
}

impl EspeakSynthesizer {
    /// Locate the engine binary.
    ///
    /// # Errors
    ///
    /// [`SynthError::Unavailable`] when no binary can be found.
    pub fn new(explicit_bin: Option<&Path>) -> Result<Self, SynthError> {
        let bin = match explicit_bin {
            Some(path) if path.exists() => path.to_path_buf(),
            Some(path) => {
                return Err(SynthError::Unavailable(format!(
                    "engine binary not found: {}",
                    path.display()
                )))
            }
            None => locate_binary().ok_or_else(|| {
                SynthError::Unavailable("espeak-ng not found (set ESPEAK_BIN or install espeak-ng)".into())
            })?,
        };

        log::info!("synth: using espeak binary {}", bin.display());
        Ok(Self {
            bin,
            settings: SpeechSettings::default(),
            voice: None,
        })
    }

    pub fn binary(&self) -> &Path {
        &self.bin
    }

    fn build_command(&self, output: &Path) -> Command {
        let mut cmd = Command::new(&self.bin);
        if let Some(voice) = &self.voice {
            cmd.arg("-v").arg(voice);
        }
        cmd.arg("-s").arg(wpm(self.settings.rate).to_string());
        cmd.arg("-a").arg(amplitude(self.settings.volume).to_string());
        cmd.arg("-w").arg(output);
        cmd.arg("--stdin");
        cmd
    }
}

impl SpeechSynthesizer for EspeakSynthesizer {
    fn voices(&self) -> Result<Vec<VoiceRecord>, SynthError> {
        let output = Command::new(&self.bin)
            .arg("--voices")
            .output()
            .map_err(|e| SynthError::VoiceList(e.to_string()))?;

        if !output.status.success() {
            return Err(SynthError::VoiceList(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
    }

    fn configure(&mut self, settings: SpeechSettings) -> Result<(), SynthError> {
        log::debug!(
            "synth: rate={} wpm, volume={:.2}",
            settings.rate,
            settings.volume
        );
        self.settings = settings;
        Ok(())
    }

    fn select_voice(&mut self, voice_id: Option<&str>) -> Result<(), SynthError> {
        self.voice = match voice_id {
            Some(id) => Some(id.to_string()),
            // Engine default: the first voice espeak lists, if any.
            None => self
                .voices()
                .ok()
                .and_then(|voices| voices.into_iter().next())
                .map(|v| v.id),
        };
        Ok(())
    }

    fn synthesize_to_file(&mut self, text: &str, output: &Path) -> Result<(), SynthError> {
        remove_stale_output(output)?;

        let mut cmd = self.build_command(output);
        log::debug!("synth: running {cmd:?}");

        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SynthError::Unavailable(e.to_string()))?;

        // Closing stdin (dropping it) lets espeak see EOF.  The child is
        // always reaped, even when the write fails because espeak exited.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };
        let result = child.wait_with_output()?;

        if !result.status.success() {
            return Err(engine_failure(&String::from_utf8_lossy(&result.stderr)));
        }
        written?;

        if !output.exists() {
            return Err(SynthError::Io(format!(
                "engine exited successfully but wrote no file at {}",
                output.display()
            )));
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        log::debug!("synth: espeak session closed");
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn locate_binary() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("ESPEAK_BIN") {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Some(pb);
        }
    }
    find_on_path("espeak-ng").or_else(|| find_on_path("espeak"))
}

fn find_on_path(bin: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(bin))
        .find(|candidate| candidate.is_file())
}

/// Delete a previous run's file so a silent engine failure cannot pass for
/// success.
fn remove_stale_output(output: &Path) -> Result<(), SynthError> {
    match std::fs::remove_file(output) {
        Ok(()) => {
            log::debug!("synth: replacing existing {}", output.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Classify a non-zero exit by its stderr.
fn engine_failure(stderr: &str) -> SynthError {
    let stderr = stderr.trim().to_string();
    if stderr.to_ascii_lowercase().contains("voice") {
        SynthError::UnsupportedVoice(stderr)
    } else {
        SynthError::Engine(stderr)
    }
}

fn wpm(rate: u32) -> u32 {
    rate.clamp(MIN_WPM, MAX_WPM)
}

fn amplitude(volume: f32) -> u32 {
    (volume.clamp(0.0, 1.0) * FULL_AMPLITUDE).round() as u32
}

/// Parse the table printed by `espeak-ng --voices`.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  en-gb           --/M      English_(Great_Britain) gmw/en
///  5  ru              --/M      Russian            zle/ru
/// ```
///
/// The language column becomes the voice id (it is what `-v` accepts);
/// underscores in the voice name become spaces.
pub fn parse_voice_list(table: &str) -> Vec<VoiceRecord> {
    table
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("Pty"))
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 4 {
                return None;
            }
            Some(VoiceRecord::new(cols[1], cols[3].replace('_', " ")))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VOICES: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 5  en-gb           --/M      English_(Great_Britain) gmw/en            (en 2)
 2  en-us           --/M      English_(America)  gmw/en-US            (en 3)
 5  ru              --/M      Russian            zle/ru
";

    #[test]
    fn parses_voice_table() {
        let voices = parse_voice_list(VOICES);
        assert_eq!(voices.len(), 4);
        assert_eq!(voices[0], VoiceRecord::new("af", "Afrikaans"));
        assert_eq!(voices[1], VoiceRecord::new("en-gb", "English (Great Britain)"));
        assert_eq!(voices[3], VoiceRecord::new("ru", "Russian"));
    }

    #[test]
    fn parse_without_header_is_empty() {
        assert!(parse_voice_list("garbage\nmore garbage").is_empty());
        assert!(parse_voice_list("").is_empty());
    }

    #[test]
    fn parse_skips_short_rows() {
        let table = "Pty Language Age/Gender VoiceName File\n 5 xx\n 5  ru  --/M  Russian  zle/ru\n";
        assert_eq!(parse_voice_list(table), vec![VoiceRecord::new("ru", "Russian")]);
    }

    #[test]
    fn rate_is_clamped_to_engine_range() {
        assert_eq!(wpm(150), 150);
        assert_eq!(wpm(10), MIN_WPM);
        assert_eq!(wpm(1000), MAX_WPM);
    }

    #[test]
    fn volume_maps_to_amplitude() {
        assert_eq!(amplitude(0.9), 90);
        assert_eq!(amplitude(1.0), 100);
        assert_eq!(amplitude(5.0), 100);
        assert_eq!(amplitude(0.0), 0);
    }

    #[test]
    fn explicit_missing_binary_is_unavailable() {
        let err = EspeakSynthesizer::new(Some(Path::new("/nonexistent/espeak-ng"))).unwrap_err();
        assert!(matches!(err, SynthError::Unavailable(_)));
    }

    #[test]
    fn command_carries_voice_rate_and_output() {
        let synth = EspeakSynthesizer {
            bin: PathBuf::from("espeak-ng"),
            settings: SpeechSettings::new(200, 0.5),
            voice: Some("ru".into()),
        };
        let cmd = synth.build_command(Path::new("/tmp/out.wav"));
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["-v", "ru", "-s", "200", "-a", "50", "-w", "/tmp/out.wav", "--stdin"]
        );
    }

    #[test]
    fn voice_errors_are_classified_from_stderr() {
        assert!(matches!(
            engine_failure("Error: voice 'xx' not found\n"),
            SynthError::UnsupportedVoice(msg) if msg == "Error: voice 'xx' not found"
        ));
        assert!(matches!(engine_failure("segfault"), SynthError::Engine(_)));
    }

    #[test]
    fn stale_output_is_removed_before_synthesis() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("old.wav");
        std::fs::write(&out, b"previous run").unwrap();

        remove_stale_output(&out).unwrap();
        assert!(!out.exists());
        // Missing file is fine.
        remove_stale_output(&out).unwrap();
    }

    /// A fake engine that rejects the voice without reading stdin.
    #[cfg(unix)]
    #[test]
    fn rejected_voice_reports_engine_stderr_not_pipe_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("temp dir");
        let bin = dir.path().join("fake-espeak");
        std::fs::write(&bin, "#!/bin/sh\necho \"Error: voice does not exist\" >&2\nexit 1\n").unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut synth = EspeakSynthesizer::new(Some(bin.as_path())).unwrap();
        synth.select_voice(Some("xx")).unwrap();
        let text = "word ".repeat(100_000);
        let err = synth
            .synthesize_to_file(&text, &dir.path().join("out.wav"))
            .unwrap_err();
        assert!(matches!(err, SynthError::UnsupportedVoice(_)), "{err:?}");
    }

    #[test]
    fn command_without_voice_omits_flag() {
        let synth = EspeakSynthesizer {
            bin: PathBuf::from("espeak-ng"),
            settings: SpeechSettings::default(),
            voice: None,
        };
        let cmd = synth.build_command(Path::new("out.wav"));
        assert!(!cmd.get_args().any(|a| a == "-v"));
    }
}
