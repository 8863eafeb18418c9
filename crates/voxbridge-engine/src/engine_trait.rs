use voxbridge_core::{AudioFrame, EngineError};

/// What a frame did to the recognizer's current utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodingState {
    /// The utterance is still open; a partial hypothesis may be available.
    Running,
    /// The frame completed an utterance; the final result is ready.
    Finalized,
}

/// An incremental speech-to-text engine.
///
/// One engine instance holds the recognition state for one session and is
/// owned exclusively by that session's loop: feed a frame with
/// [`accept_frame`](Self::accept_frame), then extract the partial or final
/// text depending on the returned [`DecodingState`]. Extraction output is
/// raw engine text; emptiness/trimming policy belongs to the caller.
pub trait SpeechEngine: Send {
    /// Returns the engine's plugin name (e.g. `"vosk"`, `"null"`).
    fn name(&self) -> &str;

    /// One-time initialisation with engine-specific TOML configuration.
    fn initialize(&mut self, config: toml::Value) -> Result<(), EngineError>;

    /// Feed one frame of mono PCM audio.
    fn accept_frame(&mut self, frame: &AudioFrame) -> Result<DecodingState, EngineError>;

    /// Best-effort hypothesis for the current, not-yet-finalized utterance.
    fn partial_result(&mut self) -> Result<String, EngineError>;

    /// Finalized transcript for the utterance just completed.
    fn final_result(&mut self) -> Result<String, EngineError>;

    /// Release engine resources. Called once during session teardown.
    fn shutdown(&mut self) -> Result<(), EngineError>;
}
