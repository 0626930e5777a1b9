use std::sync::Mutex;

use super::types::{Capability, LlmClient, Transcriber, VisionClient};
use super::{InferenceError, TranscriptionError};
use crate::config::GenerationOptions;
use crate::models::AudioPayload;

/// One call observed by [`MockLlmClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub capability: Capability,
    pub model: String,
    pub system: Option<String>,
    pub prompt: String,
    pub image_count: usize,
    pub options: GenerationOptions,
}

/// Mock reasoning client for testing. Serves both capabilities and
/// records every call it receives.
pub struct MockLlmClient {
    response: String,
    vision_response: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            vision_response: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer vision calls with a different body than text calls.
    pub fn with_vision_response(mut self, response: &str) -> Self {
        self.vision_response = Some(response.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: RecordedCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        options: &GenerationOptions,
    ) -> Result<String, InferenceError> {
        self.record(RecordedCall {
            capability: Capability::Text,
            model: model.to_string(),
            system: Some(system.to_string()),
            prompt: prompt.to_string(),
            image_count: 0,
            options: *options,
        });
        Ok(self.response.clone())
    }
}

impl VisionClient for MockLlmClient {
    fn chat_with_images(
        &self,
        model: &str,
        prompt: &str,
        images: &[String],
        system: Option<&str>,
        options: &GenerationOptions,
    ) -> Result<String, InferenceError> {
        self.record(RecordedCall {
            capability: Capability::Vision,
            model: model.to_string(),
            system: system.map(str::to_string),
            prompt: prompt.to_string(),
            image_count: images.len(),
            options: *options,
        });
        Ok(self
            .vision_response
            .clone()
            .unwrap_or_else(|| self.response.clone()))
    }
}

/// Reasoning client that is never reachable.
pub struct FailingLlmClient;

impl LlmClient for FailingLlmClient {
    fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
        _options: &GenerationOptions,
    ) -> Result<String, InferenceError> {
        Err(InferenceError::Connection("mock://unreachable".into()))
    }
}

impl VisionClient for FailingLlmClient {
    fn chat_with_images(
        &self,
        _model: &str,
        _prompt: &str,
        _images: &[String],
        _system: Option<&str>,
        _options: &GenerationOptions,
    ) -> Result<String, InferenceError> {
        Err(InferenceError::Connection("mock://unreachable".into()))
    }
}

/// Transcriber returning a fixed transcript.
pub struct MockTranscriber {
    text: String,
}

impl MockTranscriber {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, _audio: &AudioPayload) -> Result<String, TranscriptionError> {
        Ok(self.text.clone())
    }
}

/// Transcriber whose service always errors.
pub struct FailingTranscriber;

impl Transcriber for FailingTranscriber {
    fn transcribe(&self, _audio: &AudioPayload) -> Result<String, TranscriptionError> {
        Err(TranscriptionError::ServiceError {
            status: 503,
            body: "unavailable".into(),
        })
    }
}
