//! **SpokenSink** — the engine's presentation seam, delivered out loud.
//!
//! `speak` hands the text to a worker thread that synthesizes audio and plays
//! it through a `rodio::Sink`, so the engine's cycle is never blocked on
//! playback. On any synthesis or playback failure the text is printed to the
//! console instead; the fact must never be lost.

use crate::error::{VoiceError, VoiceResult};
use crate::tts::TtsBackend;
use notboring_core::PresentationSink;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{info, warn};

/// TTS-backed presentation sink. The visual label goes to the log channel;
/// speech is synthesized and played in the background.
pub struct SpokenSink {
    backend: Arc<dyn TtsBackend>,
}

impl SpokenSink {
    pub fn new(backend: Arc<dyn TtsBackend>) -> Self {
        Self { backend }
    }
}

impl PresentationSink for SpokenSink {
    fn set_location_text(&self, text: &str) {
        info!(location = %text, "location label updated");
    }

    fn speak(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        let backend = Arc::clone(&self.backend);
        let text = text.to_string();
        // Fire-and-forget: synthesis and playback both block, so they run on
        // their own thread, never on the engine's task.
        std::thread::spawn(move || {
            if let Err(e) = synthesize_and_play(backend.as_ref(), &text) {
                warn!(error = %e, "voice delivery failed");
                println!("[FALLBACK] {}", text);
            }
        });
    }
}

fn synthesize_and_play(backend: &dyn TtsBackend, text: &str) -> VoiceResult<()> {
    let audio = backend.synthesize(text)?;
    if audio.is_empty() {
        return Ok(());
    }
    let (_stream, handle) = rodio::OutputStream::try_default()
        .map_err(|e| VoiceError::Playback(format!("no audio output: {}", e)))?;
    let sink = rodio::Sink::try_new(&handle)
        .map_err(|e| VoiceError::Playback(format!("sink creation failed: {}", e)))?;
    let source = rodio::Decoder::new(Cursor::new(audio))
        .map_err(|e| VoiceError::Playback(format!("audio decode failed: {}", e)))?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
