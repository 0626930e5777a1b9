use super::{contains_any, keyword_text};
use crate::models::{CandidateCondition, UrgencyTier};

/// Symptom phrases that alone make a case urgent.
pub const URGENT_KEYWORDS: &[&str] = &[
    "severe",
    "intense",
    "unbearable",
    "emergency",
    "can't breathe",
    "chest pain",
    "difficulty breathing",
    "confused",
    "dizzy",
    "bleeding",
    "unconscious",
    "seizure",
];

/// Symptom phrases that call for care within a day or two.
pub const SOON_KEYWORDS: &[&str] = &[
    "worsening",
    "getting worse",
    "high fever",
    "persistent",
    "several days",
    "week",
    "not improving",
];

/// Keyword path: a condition this confident bumps routine to soon.
const HIGH_CONFIDENCE_SOON: u8 = 80;

/// Everything an assessor may look at.
#[derive(Debug, Clone, Copy)]
pub struct UrgencyEvidence<'a> {
    pub symptoms: &'a str,
    pub conditions: &'a [CandidateCondition],
    pub red_flags: &'a [String],
}

/// Strategy producing an urgency tier from the evidence at hand.
pub trait UrgencyAssessor: Sync {
    fn name(&self) -> &'static str;
    fn assess(&self, evidence: &UrgencyEvidence<'_>) -> UrgencyTier;
}

/// Model output is authoritative: red flags, then the conditions' own tags.
pub struct ModelAwareUrgency;

/// Symptom keywords only, for when no model output exists.
pub struct KeywordUrgency;

impl UrgencyAssessor for ModelAwareUrgency {
    fn name(&self) -> &'static str {
        "model_aware"
    }

    fn assess(&self, evidence: &UrgencyEvidence<'_>) -> UrgencyTier {
        assess_urgency_from_diagnoses(evidence.conditions, evidence.red_flags)
    }
}

impl UrgencyAssessor for KeywordUrgency {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn assess(&self, evidence: &UrgencyEvidence<'_>) -> UrgencyTier {
        assess_urgency(evidence.symptoms, evidence.conditions)
    }
}

static MODEL_AWARE: ModelAwareUrgency = ModelAwareUrgency;
static KEYWORD: KeywordUrgency = KeywordUrgency;

/// The two strategies are never blended: model output, when present, wins.
pub fn assessor_for(model_output_available: bool) -> &'static dyn UrgencyAssessor {
    if model_output_available {
        &MODEL_AWARE
    } else {
        &KEYWORD
    }
}

/// Any red flag means urgent; otherwise the most pressing condition tag wins.
pub fn assess_urgency_from_diagnoses(
    conditions: &[CandidateCondition],
    red_flags: &[String],
) -> UrgencyTier {
    if !red_flags.is_empty() {
        return UrgencyTier::Urgent;
    }
    if conditions.iter().any(|c| c.urgency == UrgencyTier::Urgent) {
        UrgencyTier::Urgent
    } else if conditions.iter().any(|c| c.urgency == UrgencyTier::Soon) {
        UrgencyTier::Soon
    } else {
        UrgencyTier::Routine
    }
}

/// Keyword heuristic over the raw symptom text (case-insensitive substrings).
pub fn assess_urgency(symptoms: &str, conditions: &[CandidateCondition]) -> UrgencyTier {
    let text = keyword_text(symptoms);

    if contains_any(&text, URGENT_KEYWORDS) {
        return UrgencyTier::Urgent;
    }
    if contains_any(&text, SOON_KEYWORDS) {
        return UrgencyTier::Soon;
    }
    let max_confidence = conditions.iter().map(|c| c.confidence).max().unwrap_or(0);
    if max_confidence >= HIGH_CONFIDENCE_SOON {
        UrgencyTier::Soon
    } else {
        UrgencyTier::Routine
    }
}
