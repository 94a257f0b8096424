//! Application entry point — PDF-to-Audio.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse the command line.
//! 3. Load [`AppConfig`] from disk (returns default on first run).
//! 4. Build the [`Converter`]: espeak-ng engine, voice catalog, classifier.
//! 5. Run the requested subcommand; the engine is shut down when the
//!    converter goes out of scope.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use pdf_to_audio::{
    config::{AppConfig, AppPaths, AudioFormat},
    language::Language,
    pipeline::{BatchOptions, BatchSummary, ConversionResult, ConvertOptions, Converter},
    synth::EspeakSynthesizer,
    voice::VoiceCatalog,
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Convert PDF documents to audio with an offline speech engine.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a single PDF
    Convert {
        /// Input PDF
        input: PathBuf,

        /// Output audio file (defaults to <name>_output.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Audio format used for derived output names
        #[arg(short, long)]
        format: Option<AudioFormat>,

        /// Speak the extracted text as-is, without cleaning
        #[arg(long)]
        no_clean: bool,

        /// Skip detection and read in this language (english, russian)
        #[arg(short, long)]
        language: Option<Language>,
    },

    /// Convert every PDF in a folder
    Batch {
        /// Folder containing PDFs
        input_dir: PathBuf,

        /// Output folder (defaults to the input folder)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Audio format for output files
        #[arg(short, long)]
        format: Option<AudioFormat>,

        /// Speaking rate in words per minute
        #[arg(short, long)]
        rate: Option<u32>,

        /// Speak the extracted text as-is, without cleaning
        #[arg(long)]
        no_clean: bool,

        /// Skip detection and read every document in this language
        #[arg(short, long)]
        language: Option<Language>,

        /// Write a JSON summary of the run to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List the engine's voices grouped by language
    Voices,

    /// Write the active settings (defaults on first run) to the settings file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .unwrap_or_else(|e| {
        log::warn!("Failed to load config, using defaults: {e}");
        AppConfig::default()
    });
    log::info!("Config loaded: {:?}", config);

    match cli.command {
        Command::Convert {
            input,
            output,
            format,
            no_clean,
            language,
        } => {
            let mut options = ConvertOptions::from_config(&config.conversion);
            options.output_path = output;
            if let Some(format) = format {
                options.format = format;
            }
            options.clean_text &= !no_clean;
            if language.is_some() {
                options.force_language = language;
            }
            convert(&config, &input, &options)
        }

        Command::Batch {
            input_dir,
            output_dir,
            format,
            rate,
            no_clean,
            language,
            report,
        } => {
            let options = BatchOptions {
                output_dir: output_dir.or_else(|| config.conversion.output_dir.clone()),
                format: format.unwrap_or(config.conversion.audio_format),
                rate,
                clean_text: config.conversion.clean_text && !no_clean,
                force_language: language.or(config.conversion.force_language),
            };
            batch(&config, &input_dir, &options, report.as_deref())
        }

        Command::Voices => list_voices(&config),

        Command::InitConfig { force } => init_config(&config, cli.config.as_deref(), force),
    }
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn convert(config: &AppConfig, input: &Path, options: &ConvertOptions) -> Result<()> {
    let mut converter = Converter::from_config(config).context("cannot start speech engine")?;

    match converter.process_document(input, options) {
        ConversionResult::Converted(report) => {
            println!(
                "Converted {} -> {} ({}, voice: {}, {:.2} MB)",
                report.input.display(),
                report.output.display(),
                report.language,
                report.voice,
                report.size_mb()
            );
            Ok(())
        }
        ConversionResult::Failed { input, stage, error } => {
            bail!("{} failed at {}: {error}", input.display(), stage.label())
        }
    }
}

fn batch(
    config: &AppConfig,
    input_dir: &Path,
    options: &BatchOptions,
    report: Option<&Path>,
) -> Result<()> {
    let mut converter = Converter::from_config(config).context("cannot start speech engine")?;
    let summary = converter.process_folder(input_dir, options)?;
    print_summary(&summary);

    if let Some(path) = report {
        summary
            .write_json(path)
            .with_context(|| format!("cannot write report {}", path.display()))?;
        log::info!("Report written to {}", path.display());
    }

    if summary.total_count > 0 && summary.success_count == 0 {
        bail!("no documents were converted");
    }
    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    println!(
        "Converted {}/{} documents",
        summary.success_count, summary.total_count
    );
    for (language, count) in &summary.per_language {
        println!("  {language}: {count}");
    }
    for failure in &summary.failures {
        println!(
            "  FAILED {} ({}): {}",
            failure.input.display(),
            failure.stage.label(),
            failure.error
        );
    }
}

fn list_voices(config: &AppConfig) -> Result<()> {
    let synth = EspeakSynthesizer::new(config.speech.engine_bin.as_deref())
        .context("cannot start speech engine")?;
    let catalog = VoiceCatalog::discover(&synth)?;

    if catalog.is_synthetic() {
        println!("Voice list unavailable; the engine default voice will be used.");
    }
    for (label, voices) in catalog.groups() {
        println!("{} ({})", label, voices.len());
        for voice in voices {
            println!("  {:>3}  {:<12} {}", voice.index, voice.id.as_deref().unwrap_or("-"), voice.name);
        }
    }
    Ok(())
}

fn init_config(config: &AppConfig, explicit: Option<&Path>, force: bool) -> Result<()> {
    let target = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppPaths::new().settings_file);
    if target.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", target.display());
    }

    match explicit {
        Some(path) => config.save_to(path),
        None => config.save(),
    }
    .with_context(|| format!("cannot write {}", target.display()))?;

    println!("Settings written to {}", target.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
