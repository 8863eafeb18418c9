use crate::engine_trait::{DecodingState, SpeechEngine};
use voxbridge_core::{AudioFrame, EngineError};

/// Dependency-free engine for wiring tests and dry runs.
///
/// Never finalizes an utterance; reports a synthetic partial per frame so the
/// whole pipeline can be exercised without a model or a recognizer library.
pub struct NullEngine {
    frame_count: usize,
    last_samples: usize,
}

impl NullEngine {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            last_samples: 0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }
}

impl Default for NullEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechEngine for NullEngine {
    fn name(&self) -> &str {
        "null"
    }

    fn initialize(&mut self, _config: toml::Value) -> Result<(), EngineError> {
        Ok(())
    }

    fn accept_frame(&mut self, frame: &AudioFrame) -> Result<DecodingState, EngineError> {
        self.frame_count += 1;
        self.last_samples = frame.samples.len();
        tracing::trace!(
            "NullEngine fed frame #{}, {} samples",
            self.frame_count,
            frame.samples.len(),
        );
        Ok(DecodingState::Running)
    }

    fn partial_result(&mut self) -> Result<String, EngineError> {
        Ok(format!(
            "[null] frame {}, {} samples",
            self.frame_count, self.last_samples,
        ))
    }

    fn final_result(&mut self) -> Result<String, EngineError> {
        Ok(String::new())
    }

    fn shutdown(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}
