use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub audio: AudioConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub sink: SinkConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AudioConfig {
    #[serde(default = "default_device_name")]
    pub device_name: String,

    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Samples handed to the engine per loop iteration.
    #[serde(default = "default_frame_size")]
    pub frame_size: u32,

    /// Device I/O buffer, in frames per callback.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            sample_rate: default_sample_rate(),
            frame_size: default_frame_size(),
            buffer_size: default_buffer_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_engine")]
    pub name: String,

    #[serde(default)]
    pub vosk: Option<VoskConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_engine(),
            vosk: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct VoskConfig {
    /// Explicit model directory. When absent the model is searched for by
    /// name next to the executable and in the working directory.
    #[serde(default)]
    pub model_path: Option<String>,

    #[serde(default = "default_model_name")]
    pub model_name: String,
}

impl Default for VoskConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            model_name: default_model_name(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SinkConfig {
    #[serde(default = "default_sink")]
    pub name: String,

    /// Sink-specific keys (e.g. `path` for the file sink), passed through
    /// to the sink's `initialize`.
    #[serde(flatten)]
    pub extra: toml::Value,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            name: default_sink(),
            extra: toml::Value::Table(Default::default()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            audio: AudioConfig::default(),
            engine: EngineConfig::default(),
            sink: SinkConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_device_name() -> String {
    "default".to_string()
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_frame_size() -> u32 {
    4000
}

fn default_buffer_size() -> u32 {
    1024
}

fn default_engine() -> String {
    "null".to_string()
}

fn default_model_name() -> String {
    "vosk-model-small-en-us-0.15".to_string()
}

fn default_sink() -> String {
    "stdout".to_string()
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => {
                errors.push(var_name.to_string());
            }
        }
    }

    if let Some(first_missing) = errors.into_iter().next() {
        return Err(ConfigError::EnvVarNotFound(first_missing));
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.audio.frame_size == 0 {
            return Err(ConfigError::ZeroFrameSize);
        }
        Ok(())
    }
}
