//! # Not Boring Voice — Spoken Fact Delivery
//!
//! Turns the engine's `speak` calls into audible speech: an HTTP TTS backend
//! synthesizes audio bytes and a rodio sink plays them back. Any failure
//! falls back to the console so the fact is never lost.

pub mod error;
pub mod speaker;
pub mod tts;

pub use error::{VoiceError, VoiceResult};
pub use speaker::SpokenSink;
pub use tts::{PlaceholderTts, StudioTts, TtsBackend};
