use serde::{Deserialize, Serialize};

use super::types::{LlmClient, VisionClient};
use super::InferenceError;
use crate::config::{GenerationOptions, InferenceSettings};

/// Ollama HTTP client for text and vision inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a new OllamaClient. Every request is bounded by `timeout_secs`.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, InferenceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| InferenceError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn from_settings(settings: &InferenceSettings) -> Result<Self, InferenceError> {
        Self::new(&settings.base_url, settings.timeout_secs)
    }

    fn map_send_error(&self, e: reqwest::Error) -> InferenceError {
        if e.is_connect() {
            InferenceError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            InferenceError::Timeout(self.timeout_secs)
        } else {
            InferenceError::HttpClient(e.to_string())
        }
    }

    fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, InferenceError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .map_err(|e| InferenceError::ResponseParsing(e.to_string()))
    }
}

/// Sampling options in Ollama's wire names.
#[derive(Debug, Clone, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

impl From<&GenerationOptions> for OllamaOptions {
    fn from(o: &GenerationOptions) -> Self {
        Self {
            temperature: o.temperature,
            num_predict: o.max_tokens,
        }
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: OllamaOptions,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Chat-based vision request for `/api/chat`.
///
/// Chat-template models (MedGemma, LLaVA, Gemma) expect images on a
/// messages-based request rather than on `/api/generate`.
#[derive(Debug, Serialize)]
struct VisionChatRequest<'a> {
    model: &'a str,
    messages: Vec<VisionChatMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct VisionChatMessage<'a> {
    role: &'static str,
    content: &'a str,
    /// Base64-encoded images (only for user messages).
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<&'a [String]>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

fn build_vision_request<'a>(
    model: &'a str,
    prompt: &'a str,
    images: &'a [String],
    system: Option<&'a str>,
    options: &GenerationOptions,
) -> VisionChatRequest<'a> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system {
        messages.push(VisionChatMessage {
            role: "system",
            content: system,
            images: None,
        });
    }
    messages.push(VisionChatMessage {
        role: "user",
        content: prompt,
        images: Some(images),
    });

    VisionChatRequest {
        model,
        messages,
        stream: false,
        options: options.into(),
    }
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        options: &GenerationOptions,
    ) -> Result<String, InferenceError> {
        let body = OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: false,
            options: options.into(),
        };
        let parsed: OllamaGenerateResponse = self.post_json("/api/generate", &body)?;
        Ok(parsed.response)
    }
}

impl VisionClient for OllamaClient {
    fn chat_with_images(
        &self,
        model: &str,
        prompt: &str,
        images: &[String],
        system: Option<&str>,
        options: &GenerationOptions,
    ) -> Result<String, InferenceError> {
        let body = build_vision_request(model, prompt, images, system, options);
        let parsed: ChatResponse = self.post_json("/api/chat", &body)?;
        Ok(parsed.message.content)
    }
}
