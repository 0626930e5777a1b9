use chrono::Utc;
use uuid::Uuid;

use super::fallback::fallback_diagnosis;
use super::inference::{InferenceError, ModelInvoker};
use super::interview::InterviewController;
use super::parser::parse_diagnosis_response;
use super::prompt::build_diagnosis_prompt;
use super::summary::model_answer;
use super::synthesis::{
    assessor_for, calculate_confidence_scores, generate_smart_recommendations, UrgencyEvidence,
};
use crate::config::InferenceSettings;
use crate::models::{
    AudioPayload, Cause, DiagnosisResult, InterviewState, InterviewStep, ModelDiagnosis,
    PatientContext, ResultSource,
};

/// Caller-facing diagnostic operations. Neither operation can fail: every
/// recoverable problem ends in a fallback result.
pub trait SymptomDiagnoser {
    fn run_diagnosis(&self, patient: PatientContext, audio: Option<&AudioPayload>) -> DiagnosisResult;
    fn next_question(&self, patient: &PatientContext, state: InterviewState) -> InterviewStep;
}

/// Orchestrates the diagnostic pipeline:
/// transcribe → prompt → model → parse → synthesize, or the keyword fallback.
pub struct DiagnosticPipeline {
    invoker: ModelInvoker,
    interview_turns: u32,
}

impl DiagnosticPipeline {
    pub fn new(invoker: ModelInvoker, interview_turns: u32) -> Self {
        Self {
            invoker,
            interview_turns,
        }
    }

    pub fn from_settings(settings: &InferenceSettings) -> Result<Self, InferenceError> {
        Ok(Self::new(
            ModelInvoker::from_settings(settings)?,
            settings.interview_turns,
        ))
    }
}

impl SymptomDiagnoser for DiagnosticPipeline {
    fn run_diagnosis(&self, patient: PatientContext, audio: Option<&AudioPayload>) -> DiagnosisResult {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("run_diagnosis", request_id = %request_id);
        let _enter = span.enter();

        let (patient, transcript) = self.invoker.transcribe_into(patient, audio);

        let prompt = build_diagnosis_prompt(&patient);
        tracing::debug!(
            prompt_chars = prompt.len(),
            has_image = patient.image().is_some(),
            "Diagnosis prompt compiled"
        );

        let raw = match self.invoker.diagnose(&prompt, patient.image()) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Routing to fallback diagnosis");
                return fallback_diagnosis(&patient, request_id, transcript);
            }
        };

        let parsed = parse_diagnosis_response(&raw);
        if !parsed.has_diagnoses() {
            tracing::warn!("Model response held no usable diagnoses, routing to fallback");
            return fallback_diagnosis(&patient, request_id, transcript);
        }

        synthesize(&patient, parsed.into_diagnosis(), request_id, transcript)
    }

    fn next_question(&self, patient: &PatientContext, state: InterviewState) -> InterviewStep {
        InterviewController::new(&self.invoker, self.interview_turns).next_question(patient, state)
    }
}

/// Turn parsed model output into the final result.
fn synthesize(
    patient: &PatientContext,
    diagnosis: ModelDiagnosis,
    request_id: Uuid,
    transcript: Option<String>,
) -> DiagnosisResult {
    let narrative = patient.narrative();
    let confidence_scores = calculate_confidence_scores(&diagnosis.diagnoses);

    let assessor = assessor_for(true);
    let urgency = assessor.assess(&UrgencyEvidence {
        symptoms: &narrative,
        conditions: &diagnosis.diagnoses,
        red_flags: &diagnosis.red_flags,
    });

    let recommendations = generate_smart_recommendations(&narrative);
    let answer = model_answer(patient, &diagnosis, &recommendations, urgency);

    tracing::info!(
        causes = diagnosis.diagnoses.len(),
        red_flags = diagnosis.red_flags.len(),
        urgency = %urgency,
        assessor = assessor.name(),
        "Diagnosis synthesized"
    );

    DiagnosisResult {
        request_id,
        generated_at: Utc::now(),
        source: ResultSource::Model,
        causes: diagnosis.diagnoses.iter().map(Cause::from).collect(),
        likely_conditions: diagnosis
            .diagnoses
            .iter()
            .map(|c| c.condition.clone())
            .collect(),
        red_flags: diagnosis.red_flags,
        additional_questions: diagnosis.additional_questions,
        recommended_tests: diagnosis.recommended_tests,
        confidence_scores,
        urgency,
        recommendations,
        transcript,
        answer,
    }
}
