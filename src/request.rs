//! JSON request surface: one request in, one result out.
//!
//! Validation errors here are the only failures a caller can see; once a
//! request reaches the pipeline it always produces a result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    AudioPayload, DiagnosisResult, ImagePayload, InterviewState, InterviewStep, ModelError,
    PatientContext,
};
use crate::pipeline::SymptomDiagnoser;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Malformed request: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ModelError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestMode {
    #[default]
    Diagnose,
    Interview,
}

fn default_age() -> u16 {
    30
}

fn default_gender() -> String {
    "unknown".to_string()
}

/// Flat request body. Interview fields are ignored in diagnose mode and
/// media fields in interview mode.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticRequest {
    #[serde(default)]
    pub mode: RequestMode,
    #[serde(default = "default_age")]
    pub age: u16,
    #[serde(default = "default_gender")]
    pub gender: String,
    #[serde(default)]
    pub symptoms: String,
    /// Base64 image, plain or as a data URL.
    pub image: Option<String>,
    /// Base64 audio, plain or as a data URL.
    pub audio: Option<String>,
    pub audio_file_name: Option<String>,
    pub audio_mime_type: Option<String>,
    #[serde(default)]
    pub turn_index: u32,
    #[serde(default)]
    pub previous_questions: Vec<String>,
    #[serde(default)]
    pub conversation_history: Vec<String>,
    /// Patient reply to the previous question, appended to the log.
    pub answer: Option<String>,
}

impl DiagnosticRequest {
    pub fn patient(&self) -> Result<PatientContext, ModelError> {
        let patient = PatientContext::new(self.age, &self.gender, &self.symptoms)?;
        match self.image.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(encoded) => Ok(patient.with_image(ImagePayload::from_base64(encoded)?)),
            None => Ok(patient),
        }
    }

    pub fn audio(&self) -> Result<Option<AudioPayload>, ModelError> {
        let Some(encoded) = self.audio.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };
        let audio = AudioPayload::from_base64(encoded)?;
        Ok(Some(match (&self.audio_file_name, &self.audio_mime_type) {
            (Some(name), Some(mime)) => audio.with_format(name, mime),
            _ => audio,
        }))
    }

    pub fn interview_state(&self) -> InterviewState {
        let state = InterviewState {
            turn_index: self.turn_index,
            previous_questions: self.previous_questions.clone(),
            conversation_history: self.conversation_history.clone(),
        };
        match self.answer.as_deref().filter(|a| !a.trim().is_empty()) {
            Some(answer) => state.with_answer(answer),
            None => state,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DiagnosticResponse {
    Diagnosis(Box<DiagnosisResult>),
    Question(InterviewStep),
}

/// Parse, validate and run one request.
pub fn handle_request(
    diagnoser: &dyn SymptomDiagnoser,
    raw: &str,
) -> Result<DiagnosticResponse, RequestError> {
    let request: DiagnosticRequest = serde_json::from_str(raw)?;
    let patient = request.patient()?;

    match request.mode {
        RequestMode::Diagnose => {
            let audio = request.audio().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Undecodable audio ignored, diagnosing without transcript");
                None
            });
            let result = diagnoser.run_diagnosis(patient, audio.as_ref());
            Ok(DiagnosticResponse::Diagnosis(Box::new(result)))
        }
        RequestMode::Interview => {
            let step = diagnoser.next_question(&patient, request.interview_state());
            Ok(DiagnosticResponse::Question(step))
        }
    }
}
