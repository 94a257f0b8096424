//! PDF-to-Audio: convert PDF documents to spoken audio files.
//!
//! Text is extracted page by page, its language (English or Russian) is
//! detected, it is cleaned up for speech, and a matching voice reads it into
//! an audio file through an offline speech engine.

pub mod config;
pub mod extract;
pub mod language;
pub mod pipeline;
pub mod synth;
pub mod text;
pub mod voice;
