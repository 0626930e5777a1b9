use super::{InferenceError, TranscriptionError};
use crate::config::GenerationOptions;
use crate::models::AudioPayload;

/// Text reasoning client abstraction (allows mocking)
pub trait LlmClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        options: &GenerationOptions,
    ) -> Result<String, InferenceError>;
}

/// Vision-augmented reasoning: the prompt travels with base64-encoded images.
pub trait VisionClient {
    fn chat_with_images(
        &self,
        model: &str,
        prompt: &str,
        images: &[String],
        system: Option<&str>,
        options: &GenerationOptions,
    ) -> Result<String, InferenceError>;
}

/// Speech-to-text capability.
pub trait Transcriber {
    fn transcribe(&self, audio: &AudioPayload) -> Result<String, TranscriptionError>;
}

/// Which capability served a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Text,
    Vision,
}
