//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for speech,
//! conversion and language detection, `AppPaths` for the platform config
//! directory, and TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, AudioFormat, ConversionConfig, LanguageConfig, SpeechConfig};
