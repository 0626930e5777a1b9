//! Speech-to-text over an OpenAI-compatible `/v1/audio/transcriptions` endpoint.

use serde::Deserialize;

use super::types::Transcriber;
use super::TranscriptionError;
use crate::config::InferenceSettings;
use crate::models::AudioPayload;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Blocking Whisper-style transcription client.
pub struct WhisperClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl WhisperClient {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, TranscriptionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TranscriptionError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.map(str::to_string),
            client,
            timeout_secs,
        })
    }

    pub fn from_settings(settings: &InferenceSettings) -> Result<Self, TranscriptionError> {
        Self::new(
            &settings.transcription_url,
            &settings.transcription_model,
            settings.transcription_api_key.as_deref(),
            settings.timeout_secs,
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/audio/transcriptions", self.base_url)
    }
}

impl Transcriber for WhisperClient {
    fn transcribe(&self, audio: &AudioPayload) -> Result<String, TranscriptionError> {
        if audio.is_empty() {
            return Err(TranscriptionError::InvalidAudio("empty audio payload".into()));
        }

        let file_part = reqwest::blocking::multipart::Part::bytes(audio.bytes().to_vec())
            .file_name(audio.file_name().to_string())
            .mime_str(audio.mime_type())
            .map_err(|e| TranscriptionError::InvalidAudio(e.to_string()))?;

        let form = reqwest::blocking::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "json");

        let mut request = self.client.post(self.endpoint()).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                TranscriptionError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                TranscriptionError::Timeout(self.timeout_secs)
            } else {
                TranscriptionError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TranscriptionError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TranscriptionResponse = response
            .json()
            .map_err(|e| TranscriptionError::ResponseParsing(e.to_string()))?;

        tracing::debug!(chars = parsed.text.len(), "Transcription received");
        Ok(parsed.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_path_is_openai_compatible() {
        let client = WhisperClient::new("http://localhost:8001/", "whisper-1", None, 30).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8001/v1/audio/transcriptions");
    }

    #[test]
    fn from_settings_copies_key_and_model() {
        let settings = InferenceSettings {
            transcription_model: "large-v3".into(),
            transcription_api_key: Some("sk-test".into()),
            ..Default::default()
        };
        let client = WhisperClient::from_settings(&settings).unwrap();
        assert_eq!(client.model, "large-v3");
        assert_eq!(client.api_key.as_deref(), Some("sk-test"));
        assert_eq!(client.timeout_secs, settings.timeout_secs);
    }

    #[test]
    fn empty_audio_rejected_before_network() {
        let client = WhisperClient::new("http://localhost:1", "whisper-1", None, 1).unwrap();
        let err = client.transcribe(&AudioPayload::new(vec![])).unwrap_err();
        assert!(matches!(err, TranscriptionError::InvalidAudio(_)));
    }

    #[test]
    fn transcription_response_parses() {
        let parsed: TranscriptionResponse =
            serde_json::from_str(r#"{"text": " my head hurts "}"#).unwrap();
        assert_eq!(parsed.text.trim(), "my head hurts");
    }
}
