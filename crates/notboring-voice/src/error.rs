//! Error types for the voice delivery layer.

use thiserror::Error;

/// Result type alias for voice operations.
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Errors that can occur while synthesizing or playing speech.
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TTS synthesis error: {0}")]
    Synthesis(String),

    #[error("Audio playback error: {0}")]
    Playback(String),
}
