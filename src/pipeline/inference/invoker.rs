use std::sync::Arc;

use super::ollama::OllamaClient;
use super::transcription::WhisperClient;
use super::types::{Capability, LlmClient, Transcriber, VisionClient};
use super::{InferenceError, InferenceUnavailable};
use crate::config::{GenerationOptions, InferenceSettings};
use crate::models::{AudioPayload, ImagePayload, PatientContext};
use crate::pipeline::prompt::{
    INTERVIEW_SYSTEM_PROMPT, TEXT_DIAGNOSIS_SYSTEM_PROMPT, VISION_DIAGNOSIS_SYSTEM_PROMPT,
};

/// Dispatches compiled prompts to the text or vision capability and runs
/// speech transcription ahead of diagnosis.
///
/// Every client failure leaves this type as [`InferenceUnavailable`].
pub struct ModelInvoker {
    text: Arc<dyn LlmClient + Send + Sync>,
    vision: Arc<dyn VisionClient + Send + Sync>,
    transcriber: Option<Arc<dyn Transcriber + Send + Sync>>,
    text_model: String,
    vision_model: String,
    diagnosis_options: GenerationOptions,
    interview_options: GenerationOptions,
}

impl ModelInvoker {
    pub fn new(
        text: Arc<dyn LlmClient + Send + Sync>,
        vision: Arc<dyn VisionClient + Send + Sync>,
        settings: &InferenceSettings,
    ) -> Self {
        Self {
            text,
            vision,
            transcriber: None,
            text_model: settings.text_model.clone(),
            vision_model: settings.vision_model.clone(),
            diagnosis_options: settings.diagnosis,
            interview_options: settings.interview,
        }
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber + Send + Sync>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Ollama for both reasoning capabilities, Whisper for speech.
    pub fn from_settings(settings: &InferenceSettings) -> Result<Self, InferenceError> {
        let ollama = Arc::new(OllamaClient::from_settings(settings)?);
        let invoker = Self::new(ollama.clone(), ollama, settings);

        match WhisperClient::from_settings(settings) {
            Ok(whisper) => Ok(invoker.with_transcriber(Arc::new(whisper))),
            Err(e) => {
                tracing::warn!(error = %e, "Transcription client unavailable, audio will be ignored");
                Ok(invoker)
            }
        }
    }

    /// Vision when an image is attached, text otherwise.
    pub fn capability_for(image: Option<&ImagePayload>) -> Capability {
        if image.is_some() {
            Capability::Vision
        } else {
            Capability::Text
        }
    }

    /// Run a diagnosis-mode prompt and return the raw model text.
    pub fn diagnose(
        &self,
        prompt: &str,
        image: Option<&ImagePayload>,
    ) -> Result<String, InferenceUnavailable> {
        let capability = Self::capability_for(image);
        let result = match image {
            Some(image) => {
                let images = [image.as_base64().to_string()];
                self.vision.chat_with_images(
                    &self.vision_model,
                    prompt,
                    &images,
                    Some(VISION_DIAGNOSIS_SYSTEM_PROMPT),
                    &self.diagnosis_options,
                )
            }
            None => self.text.generate(
                &self.text_model,
                prompt,
                TEXT_DIAGNOSIS_SYSTEM_PROMPT,
                &self.diagnosis_options,
            ),
        };
        Self::finish(capability, result)
    }

    /// Run an interview-mode prompt on the text capability.
    pub fn ask_interview(&self, prompt: &str) -> Result<String, InferenceUnavailable> {
        let result = self.text.generate(
            &self.text_model,
            prompt,
            INTERVIEW_SYSTEM_PROMPT,
            &self.interview_options,
        );
        Self::finish(Capability::Text, result)
    }

    /// Transcribe `audio` (if any) and fold the transcript into the patient
    /// narrative. Failures are logged and the patient is returned unchanged.
    pub fn transcribe_into(
        &self,
        patient: PatientContext,
        audio: Option<&AudioPayload>,
    ) -> (PatientContext, Option<String>) {
        let Some(audio) = audio else {
            return (patient, None);
        };
        let Some(transcriber) = &self.transcriber else {
            tracing::warn!("Audio supplied but no transcription service configured");
            return (patient, None);
        };

        match transcriber.transcribe(audio) {
            Ok(text) if !text.trim().is_empty() => {
                tracing::info!(chars = text.len(), "Audio transcribed");
                let patient = patient.with_transcript(text.trim());
                (patient, Some(text.trim().to_string()))
            }
            Ok(_) => {
                tracing::warn!("Transcription returned no text");
                (patient, None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Transcription failed, continuing without transcript");
                (patient, None)
            }
        }
    }

    fn finish(
        capability: Capability,
        result: Result<String, InferenceError>,
    ) -> Result<String, InferenceUnavailable> {
        let outcome = result.and_then(|text| {
            if text.trim().is_empty() {
                Err(InferenceError::EmptyResponse)
            } else {
                Ok(text)
            }
        });
        match outcome {
            Ok(text) => {
                tracing::debug!(?capability, chars = text.len(), "Inference complete");
                Ok(text)
            }
            Err(e) => {
                tracing::warn!(?capability, error = %e, "Inference unavailable");
                Err(InferenceUnavailable(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::inference::mock::{
        FailingLlmClient, FailingTranscriber, MockLlmClient, MockTranscriber,
    };

    fn invoker_with(client: Arc<MockLlmClient>) -> ModelInvoker {
        ModelInvoker::new(client.clone(), client, &InferenceSettings::default())
    }

    fn patient() -> PatientContext {
        PatientContext::new(28, "female", "Itchy rash").unwrap()
    }

    #[test]
    fn text_capability_without_image() {
        let client = Arc::new(MockLlmClient::new("{}"));
        let invoker = invoker_with(client.clone());
        assert_eq!(invoker.diagnose("prompt", None).unwrap(), "{}");

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].capability, Capability::Text);
        assert_eq!(calls[0].system.as_deref(), Some(TEXT_DIAGNOSIS_SYSTEM_PROMPT));
        assert_eq!(calls[0].options, GenerationOptions::DIAGNOSIS);
    }

    #[test]
    fn vision_capability_with_image() {
        let client = Arc::new(MockLlmClient::new("{}"));
        let invoker = invoker_with(client.clone());
        let image = ImagePayload::from_bytes(b"jpeg");
        invoker.diagnose("prompt", Some(&image)).unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].capability, Capability::Vision);
        assert_eq!(calls[0].image_count, 1);
        assert_eq!(calls[0].system.as_deref(), Some(VISION_DIAGNOSIS_SYSTEM_PROMPT));
    }

    #[test]
    fn interview_uses_interview_options() {
        let client = Arc::new(MockLlmClient::new("How long has it itched?"));
        let invoker = invoker_with(client.clone());
        invoker.ask_interview("prompt").unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].options, GenerationOptions::INTERVIEW);
        assert_eq!(calls[0].system.as_deref(), Some(INTERVIEW_SYSTEM_PROMPT));
    }

    #[test]
    fn client_failure_is_inference_unavailable() {
        let failing = Arc::new(FailingLlmClient);
        let invoker = ModelInvoker::new(failing.clone(), failing, &InferenceSettings::default());
        let err = invoker.diagnose("prompt", None).unwrap_err();
        assert!(matches!(err.0, InferenceError::Connection(_)));
    }

    #[test]
    fn blank_response_is_inference_unavailable() {
        let invoker = invoker_with(Arc::new(MockLlmClient::new("   ")));
        let err = invoker.ask_interview("prompt").unwrap_err();
        assert!(matches!(err.0, InferenceError::EmptyResponse));
    }

    #[test]
    fn transcript_folded_into_patient() {
        let invoker = invoker_with(Arc::new(MockLlmClient::new("{}")))
            .with_transcriber(Arc::new(MockTranscriber::new(" worse after showers ")));
        let audio = AudioPayload::new(vec![1, 2, 3]);
        let (patient, transcript) = invoker.transcribe_into(patient(), Some(&audio));
        assert_eq!(transcript.as_deref(), Some("worse after showers"));
        assert_eq!(patient.voice_transcript(), Some("worse after showers"));
    }

    #[test]
    fn transcription_failure_is_swallowed() {
        let invoker = invoker_with(Arc::new(MockLlmClient::new("{}")))
            .with_transcriber(Arc::new(FailingTranscriber));
        let audio = AudioPayload::new(vec![1]);
        let (patient, transcript) = invoker.transcribe_into(patient(), Some(&audio));
        assert!(transcript.is_none());
        assert!(patient.voice_transcript().is_none());
        assert_eq!(patient.narrative(), "Itchy rash");
    }

    #[test]
    fn audio_without_transcriber_is_ignored() {
        let invoker = invoker_with(Arc::new(MockLlmClient::new("{}")));
        let audio = AudioPayload::new(vec![1]);
        let (_, transcript) = invoker.transcribe_into(patient(), Some(&audio));
        assert!(transcript.is_none());
    }

    #[test]
    fn from_settings_builds_clients() {
        let invoker = ModelInvoker::from_settings(&InferenceSettings::default()).unwrap();
        assert_eq!(invoker.text_model, "medgemma");
        assert!(invoker.transcriber.is_some());
    }
}
