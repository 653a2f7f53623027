//! # optima-media
//!
//! The video-assistant backends: narration-script generation through the
//! LLM provider, voice synthesis against a VoiceRSS-compatible HTTP API,
//! and audio transcription against a Deepgram-compatible API.

#![deny(unsafe_code)]

pub mod errors;
pub mod script;
pub mod transcribe;
pub mod voice;

pub use errors::{MediaError, Result};
pub use script::ScriptGenerator;
pub use transcribe::{Transcriber, Transcription};
pub use voice::VoiceSynthesizer;
