use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{ResultSource, UrgencyTier};

/// One entry of the model's differential diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateCondition {
    pub condition: String,
    /// Model-asserted likelihood, 0-100.
    pub confidence: u8,
    pub explanation: String,
    pub urgency: UrgencyTier,
    pub specialty: String,
}

/// Typed payload recovered from the model's diagnosis response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDiagnosis {
    pub diagnoses: Vec<CandidateCondition>,
    pub red_flags: Vec<String>,
    pub additional_questions: Vec<String>,
    pub recommended_tests: Vec<String>,
}

/// External view of a [`CandidateCondition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cause {
    pub cause: String,
    pub value: u8,
    pub explanation: String,
    pub urgency: UrgencyTier,
    pub specialty: String,
}

impl From<&CandidateCondition> for Cause {
    fn from(c: &CandidateCondition) -> Self {
        Self {
            cause: c.condition.clone(),
            value: c.confidence,
            explanation: c.explanation.clone(),
            urgency: c.urgency,
            specialty: c.specialty.clone(),
        }
    }
}

/// Share of diagnostic weight in each confidence band. Sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBands {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl ConfidenceBands {
    /// Distribution used whenever no per-condition weights exist.
    pub const DEFAULT: ConfidenceBands = ConfidenceBands {
        high: 0.6,
        medium: 0.3,
        low: 0.1,
    };

    pub fn total(&self) -> f64 {
        self.high + self.medium + self.low
    }
}

impl Default for ConfidenceBands {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
}

impl Recommendation {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Complete outcome of one diagnostic request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub source: ResultSource,
    /// Empty on the fallback path, which never scores individual conditions.
    pub causes: Vec<Cause>,
    /// Condition names, from the model or from fallback keyword rules.
    pub likely_conditions: Vec<String>,
    pub red_flags: Vec<String>,
    pub additional_questions: Vec<String>,
    pub recommended_tests: Vec<String>,
    pub confidence_scores: ConfidenceBands,
    pub urgency: UrgencyTier,
    pub recommendations: Vec<Recommendation>,
    pub transcript: Option<String>,
    /// Plaintext assessment.
    pub answer: String,
}
