use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("audio.frame_size must be non-zero")]
    ZeroFrameSize,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("failed to enumerate devices: {0}")]
    DeviceEnumeration(String),

    #[error("failed to build stream: {0}")]
    StreamBuild(String),

    #[error("stream error: {0}")]
    StreamError(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("model '{model}' not found; searched: {}", format_searched(.searched))]
    ModelNotFound {
        model: String,
        searched: Vec<PathBuf>,
    },

    #[error("failed to load model at {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    #[error("engine not found: {0}")]
    EngineNotFound(String),

    #[error("engine initialization failed: {0}")]
    InitializationFailed(String),

    #[error("engine processing failed: {0}")]
    ProcessingFailed(String),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink initialization failed: {0}")]
    InitializationFailed(String),

    #[error("failed to emit event: {0}")]
    EmitFailed(String),

    #[error("sink not found: {0}")]
    NotFound(String),
}

fn format_searched(searched: &[PathBuf]) -> String {
    searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
