//! TTS backends: text in, audio bytes out.

use crate::error::{VoiceError, VoiceResult};
use std::time::Duration;

/// Backend that turns text into audio bytes (WAV/MP3). Return an empty vec
/// to skip playback.
pub trait TtsBackend: Send + Sync {
    fn synthesize(&self, text: &str) -> VoiceResult<Vec<u8>>;
}

/// Placeholder TTS: returns empty audio so nothing plays. Use in tests and
/// headless runs.
#[derive(Debug, Default)]
pub struct PlaceholderTts;

impl TtsBackend for PlaceholderTts {
    fn synthesize(&self, _text: &str) -> VoiceResult<Vec<u8>> {
        Ok(Vec::new())
    }
}

/// Production TTS backend: OpenAI-compatible `/audio/speech` API.
///
/// Uses `TTS_API_URL` (default `https://api.openai.com/v1`) and `TTS_API_KEY`.
/// The default voice is `fable`, the closest match to natural British speech.
#[derive(Debug, Clone)]
pub struct StudioTts {
    /// Base URL without trailing slash.
    pub base_url: String,
    /// Bearer API key.
    pub api_key: String,
    /// TTS model: tts-1 (fast) or tts-1-hd (higher quality).
    pub model: String,
    /// Voice name (alloy, echo, fable, onyx, nova, shimmer, ...).
    pub voice: String,
    client: reqwest::blocking::Client,
}

impl StudioTts {
    /// Build from environment: `TTS_API_URL`, `TTS_API_KEY`, `TTS_MODEL`,
    /// `TTS_VOICE`.
    pub fn from_env() -> VoiceResult<Self> {
        let base_url = std::env::var("TTS_API_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let api_key = std::env::var("TTS_API_KEY")
            .map_err(|_| VoiceError::Config("TTS requires TTS_API_KEY".to_string()))?;
        let model = std::env::var("TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string());
        let voice = std::env::var("TTS_VOICE").unwrap_or_else(|_| "fable".to_string());
        Ok(Self::new(base_url, api_key, model, voice))
    }

    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            voice: voice.into(),
            client,
        }
    }
}

impl TtsBackend for StudioTts {
    fn synthesize(&self, text: &str) -> VoiceResult<Vec<u8>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/audio/speech", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "voice": self.voice,
            "input": text,
            "response_format": "mp3",
        });
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| VoiceError::Synthesis(format!("TTS request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().unwrap_or_default();
            return Err(VoiceError::Synthesis(format!(
                "TTS API error {}: {}",
                status, body
            )));
        }

        let bytes = res
            .bytes()
            .map_err(|e| VoiceError::Synthesis(format!("TTS body read failed: {}", e)))?;
        Ok(bytes.to_vec())
    }
}
