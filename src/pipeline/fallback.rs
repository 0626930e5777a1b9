//! Deterministic keyword-rule diagnosis for when the model path yields nothing.
//!
//! Nothing in here touches the model invoker or the response parser.

use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    ConfidenceBands, DiagnosisResult, PatientContext, Recommendation, ResultSource,
};
use crate::pipeline::summary::fallback_answer;
use crate::pipeline::synthesis::{assessor_for, contains_any, keyword_text, UrgencyEvidence};

/// Most condition labels the fallback reports.
pub const MAX_FALLBACK_CONDITIONS: usize = 3;

pub const GENERIC_CONDITION: &str = "General medical condition";

/// Keyword group and the condition label it suggests, in scan order.
const CONDITION_RULES: &[(&[&str], &str)] = &[
    (&["fever", "temperature", "hot", "chills"], "Viral or bacterial infection"),
    (&["cough", "throat", "sore throat"], "Upper respiratory infection"),
    (&["headache", "head pain", "migraine"], "Headache disorder"),
    (&["stomach", "nausea", "vomit", "diarrhea"], "Gastrointestinal issue"),
    (&["pain", "ache", "hurt", "sore"], "Musculoskeletal condition"),
];

const GENERAL_STEPS: &[(&str, &str)] = &[
    ("Monitor symptoms", "Monitor symptoms and note any changes"),
    ("Stay hydrated", "Stay hydrated with plenty of fluids"),
    ("Get adequate rest", "Get adequate rest to support recovery"),
    ("Consult a healthcare provider", "Consult a healthcare provider for proper evaluation"),
    ("Seek immediate care", "Seek immediate care if symptoms worsen significantly"),
];

/// Condition labels whose keyword group appears in `symptoms`, at most three.
pub fn fallback_conditions(symptoms: &str) -> Vec<String> {
    let text = keyword_text(symptoms);
    let matched: Vec<String> = CONDITION_RULES
        .iter()
        .filter(|(keywords, _)| contains_any(&text, keywords))
        .take(MAX_FALLBACK_CONDITIONS)
        .map(|(_, label)| label.to_string())
        .collect();

    if matched.is_empty() {
        vec![GENERIC_CONDITION.to_string()]
    } else {
        matched
    }
}

/// The fixed five-step general advice list.
pub fn fallback_recommendations() -> Vec<Recommendation> {
    GENERAL_STEPS
        .iter()
        .map(|(title, description)| Recommendation::new(title, description))
        .collect()
}

/// Build a complete result without any model involvement.
pub fn fallback_diagnosis(
    patient: &PatientContext,
    request_id: Uuid,
    transcript: Option<String>,
) -> DiagnosisResult {
    let narrative = patient.narrative();
    let likely_conditions = fallback_conditions(&narrative);
    let recommendations = fallback_recommendations();

    let assessor = assessor_for(false);
    let urgency = assessor.assess(&UrgencyEvidence {
        symptoms: &narrative,
        conditions: &[],
        red_flags: &[],
    });

    tracing::info!(
        conditions = likely_conditions.len(),
        urgency = %urgency,
        assessor = assessor.name(),
        "Fallback diagnosis produced"
    );

    let answer = fallback_answer(patient, &likely_conditions, &recommendations);

    DiagnosisResult {
        request_id,
        generated_at: Utc::now(),
        source: ResultSource::Fallback,
        causes: Vec::new(),
        likely_conditions,
        red_flags: Vec::new(),
        additional_questions: Vec::new(),
        recommended_tests: Vec::new(),
        confidence_scores: ConfidenceBands::DEFAULT,
        urgency,
        recommendations,
        transcript,
        answer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UrgencyTier;

    fn patient(symptoms: &str) -> PatientContext {
        PatientContext::new(60, "female", symptoms).unwrap()
    }

    #[test]
    fn chest_pain_scenario() {
        let result = fallback_diagnosis(
            &patient("severe chest pain, can't breathe"),
            Uuid::new_v4(),
            None,
        );
        assert!(result
            .likely_conditions
            .contains(&"Musculoskeletal condition".to_string()));
        assert_eq!(result.urgency, UrgencyTier::Urgent);
        assert_eq!(result.source, ResultSource::Fallback);
        assert!(result.causes.is_empty());
    }

    #[test]
    fn no_keywords_gives_generic_condition() {
        assert_eq!(fallback_conditions("itchy rash"), vec![GENERIC_CONDITION]);
    }

    #[test]
    fn at_most_three_conditions_in_rule_order() {
        let conditions = fallback_conditions("fever, sore throat, headache, nausea and back pain");
        assert_eq!(
            conditions,
            vec![
                "Viral or bacterial infection",
                "Upper respiratory infection",
                "Headache disorder"
            ]
        );
    }

    #[test]
    fn fixed_distribution_and_steps() {
        let result = fallback_diagnosis(&patient("stomach cramps"), Uuid::new_v4(), None);
        assert_eq!(result.confidence_scores, ConfidenceBands::DEFAULT);
        assert_eq!(result.recommendations.len(), 5);
        assert_eq!(
            result.recommendations[4].description,
            "Seek immediate care if symptoms worsen significantly"
        );
        assert_eq!(result.likely_conditions, vec!["Gastrointestinal issue"]);
    }

    #[test]
    fn empty_symptoms_use_placeholder_narrative() {
        let result = fallback_diagnosis(&patient(""), Uuid::new_v4(), None);
        assert_eq!(result.likely_conditions, vec![GENERIC_CONDITION]);
        assert_eq!(result.urgency, UrgencyTier::Routine);
    }

    #[test]
    fn transcript_is_scanned_and_echoed() {
        let ctx = patient("tired").with_transcript("the rash has been persistent");
        let result = fallback_diagnosis(&ctx, Uuid::new_v4(), Some("the rash has been persistent".into()));
        assert_eq!(result.urgency, UrgencyTier::Soon);
        assert_eq!(result.transcript.as_deref(), Some("the rash has been persistent"));
        assert!(result.answer.contains("Voice transcript: the rash has been persistent"));
    }
}
