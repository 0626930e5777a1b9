use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "differential";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Env var prefix for settings overrides.
const ENV_PREFIX: &str = "DIFFERENTIAL_";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "differential_lib=info,differential=info,warn"
}

/// Directory holding the optional settings file.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Default settings file location.
pub fn settings_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("settings.json"))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed settings file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Sampling options for one kind of inference call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl GenerationOptions {
    /// Low temperature keeps the JSON schema stable.
    pub const DIAGNOSIS: GenerationOptions = GenerationOptions {
        temperature: 0.2,
        max_tokens: 800,
    };

    pub const INTERVIEW: GenerationOptions = GenerationOptions {
        temperature: 0.7,
        max_tokens: 150,
    };
}

/// Endpoints, models, and limits for the external inference services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    /// Ollama-compatible reasoning endpoint.
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    /// OpenAI-compatible speech endpoint (`/v1/audio/transcriptions`).
    pub transcription_url: String,
    pub transcription_model: String,
    pub transcription_api_key: Option<String>,
    pub timeout_secs: u64,
    pub diagnosis: GenerationOptions,
    pub interview: GenerationOptions,
    /// Planned interview length, shown to the model as "question N of M".
    pub interview_turns: u32,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            text_model: "medgemma".to_string(),
            vision_model: "medgemma".to_string(),
            transcription_url: "http://localhost:8001".to_string(),
            transcription_model: "whisper-1".to_string(),
            transcription_api_key: None,
            timeout_secs: 120,
            diagnosis: GenerationOptions::DIAGNOSIS,
            interview: GenerationOptions::INTERVIEW,
            interview_turns: 10,
        }
    }
}

impl InferenceSettings {
    /// Defaults, then the settings file (if present), then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = match settings_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        tracing::debug!(
            base_url = %settings.base_url,
            text_model = %settings.text_model,
            vision_model = %settings.vision_model,
            timeout_secs = settings.timeout_secs,
            "Inference settings loaded"
        );
        Ok(settings)
    }

    /// Read settings from a JSON file. Absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Apply `DIFFERENTIAL_*` overrides using `lookup` to read each variable.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(v) = var("BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = var("TEXT_MODEL") {
            self.text_model = v;
        }
        if let Some(v) = var("VISION_MODEL") {
            self.vision_model = v;
        }
        if let Some(v) = var("TRANSCRIPTION_URL") {
            self.transcription_url = v;
        }
        if let Some(v) = var("TRANSCRIPTION_MODEL") {
            self.transcription_model = v;
        }
        if let Some(v) = var("TRANSCRIPTION_API_KEY") {
            self.transcription_api_key = Some(v).filter(|k| !k.is_empty());
        }
        if let Some(v) = var("TIMEOUT_SECS") {
            self.timeout_secs = match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: format!("{ENV_PREFIX}TIMEOUT_SECS"),
                        value: v,
                    })
                }
            };
        }
        Ok(())
    }
}
