use crate::engine_trait::{DecodingState, SpeechEngine};
use std::path::PathBuf;
use vosk::{Model, Recognizer};
use voxbridge_core::{AudioFrame, EngineError};

/// Offline Kaldi-based recognizer backed by the `vosk` crate.
///
/// The model data is read-only once loaded; the recognizer accumulates
/// acoustic context across frames and segments utterances on silence.
pub struct VoskEngine {
    model: Option<Model>,
    recognizer: Option<Recognizer>,
}

impl VoskEngine {
    pub fn new() -> Self {
        Self {
            model: None,
            recognizer: None,
        }
    }

    fn recognizer(&mut self) -> Result<&mut Recognizer, EngineError> {
        self.recognizer
            .as_mut()
            .ok_or_else(|| EngineError::ProcessingFailed("engine not initialized".to_string()))
    }
}

impl Default for VoskEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechEngine for VoskEngine {
    fn name(&self) -> &str {
        "vosk"
    }

    fn initialize(&mut self, config: toml::Value) -> Result<(), EngineError> {
        let model_path = config
            .get("model_path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                EngineError::InitializationFailed("missing 'model_path' in vosk config".to_string())
            })?;
        let sample_rate = config
            .get("sample_rate")
            .and_then(|v| v.as_integer())
            .unwrap_or(16000) as f32;

        let model = Model::new(model_path).ok_or_else(|| EngineError::ModelLoad {
            path: PathBuf::from(model_path),
            reason: "vosk could not read a model from this directory".to_string(),
        })?;

        let recognizer = Recognizer::new(&model, sample_rate).ok_or_else(|| {
            EngineError::InitializationFailed(format!(
                "could not create a recognizer at {sample_rate} Hz",
            ))
        })?;

        tracing::info!(model_path = %model_path, sample_rate, "vosk model loaded");
        self.model = Some(model);
        self.recognizer = Some(recognizer);
        Ok(())
    }

    fn accept_frame(&mut self, frame: &AudioFrame) -> Result<DecodingState, EngineError> {
        let recognizer = self.recognizer()?;
        match recognizer.accept_waveform(&frame.samples) {
            Ok(vosk::DecodingState::Finalized) => Ok(DecodingState::Finalized),
            Ok(vosk::DecodingState::Running) => Ok(DecodingState::Running),
            Ok(vosk::DecodingState::Failed) => Err(EngineError::ProcessingFailed(
                "recognizer entered a failed state".to_string(),
            )),
            Err(e) => Err(EngineError::ProcessingFailed(e.to_string())),
        }
    }

    fn partial_result(&mut self) -> Result<String, EngineError> {
        let recognizer = self.recognizer()?;
        Ok(recognizer.partial_result().partial.to_string())
    }

    fn final_result(&mut self) -> Result<String, EngineError> {
        let recognizer = self.recognizer()?;
        Ok(recognizer
            .result()
            .single()
            .map(|r| r.text.to_string())
            .unwrap_or_default())
    }

    fn shutdown(&mut self) -> Result<(), EngineError> {
        self.recognizer = None;
        self.model = None;
        Ok(())
    }
}
