pub mod engine_trait;
pub mod null_engine;
pub mod registry;
pub mod resolver;
#[cfg(feature = "vosk")]
pub mod vosk_engine;

pub use engine_trait::{DecodingState, SpeechEngine};
pub use null_engine::NullEngine;
pub use registry::EngineRegistry;
pub use resolver::{resolve_model_dir, MODEL_DIR_ENV};
#[cfg(feature = "vosk")]
pub use vosk_engine::VoskEngine;
