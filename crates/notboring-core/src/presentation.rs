//! Presentation seam: where validated facts leave the engine.
//!
//! Two one-way calls, fire-and-forget; the engine never consults a return
//! value. Rendering and audio are external collaborators behind this trait.

/// Visual label + voice delivery. Implementations must not block the engine
/// for longer than they need to hand the text off.
pub trait PresentationSink: Send + Sync {
    /// Update the visual location label.
    fn set_location_text(&self, text: &str);

    /// Speak the given text.
    fn speak(&self, text: &str);
}

/// Console rendition of the sink, for headless runs and diagnostics.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl PresentationSink for ConsoleSink {
    fn set_location_text(&self, text: &str) {
        println!("[LOCATION] {}", text);
    }

    fn speak(&self, text: &str) {
        println!("[RUPERT] {}", text);
    }
}
