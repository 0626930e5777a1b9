use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::models::{CandidateCondition, ModelDiagnosis, UrgencyTier};

/// Most causes kept from one model response.
pub const MAX_CAUSES: usize = 5;

const DEFAULT_SPECIALTY: &str = "Primary Care";

/// Greedy first-`{` to last-`}` span, across newlines.
static OBJECT_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Outcome of parsing a diagnosis-mode response. Parsing never fails:
/// unusable text becomes [`ParsedResponse::Empty`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    Parsed(ModelDiagnosis),
    Empty,
}

impl ParsedResponse {
    /// `Empty` is the payload `{diagnoses: []}` with every list empty.
    pub fn into_diagnosis(self) -> ModelDiagnosis {
        match self {
            Self::Parsed(d) => d,
            Self::Empty => ModelDiagnosis::default(),
        }
    }

    pub fn has_diagnoses(&self) -> bool {
        matches!(self, Self::Parsed(d) if !d.diagnoses.is_empty())
    }
}

/// Top-level fields of a diagnosis response. A field of the wrong shape
/// reads as absent instead of failing the whole object.
#[derive(Deserialize)]
struct RawResponse {
    diagnoses: Option<Value>,
    red_flags: Option<Value>,
    additional_questions: Option<Value>,
    recommended_tests: Option<Value>,
}

fn array(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Parse raw model text: whole string first, then the outermost `{...}` span.
pub fn parse_diagnosis_response(raw: &str) -> ParsedResponse {
    if let Ok(parsed) = serde_json::from_str::<RawResponse>(raw.trim()) {
        return ParsedResponse::Parsed(normalize(parsed));
    }

    let Some(span) = OBJECT_SPAN.find(raw) else {
        tracing::warn!(chars = raw.len(), "No JSON object in model response");
        return ParsedResponse::Empty;
    };

    match serde_json::from_str::<RawResponse>(span.as_str()) {
        Ok(parsed) => {
            tracing::debug!("Model response salvaged from surrounding prose");
            ParsedResponse::Parsed(normalize(parsed))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Model response salvage failed");
            ParsedResponse::Empty
        }
    }
}

fn normalize(raw: RawResponse) -> ModelDiagnosis {
    let mut diagnoses: Vec<CandidateCondition> = array(raw.diagnoses)
        .iter()
        .filter_map(parse_condition)
        .collect();

    // Stable: equal confidences keep the model's order.
    diagnoses.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    diagnoses.truncate(MAX_CAUSES);

    ModelDiagnosis {
        diagnoses,
        red_flags: string_list(raw.red_flags),
        additional_questions: string_list(raw.additional_questions),
        recommended_tests: string_list(raw.recommended_tests),
    }
}

/// Items without a condition name or a usable confidence are dropped.
fn parse_condition(item: &Value) -> Option<CandidateCondition> {
    let obj = item.as_object()?;
    let condition = obj.get("condition")?.as_str()?.trim();
    if condition.is_empty() {
        return None;
    }
    let confidence = parse_confidence(obj.get("confidence")?)?;

    let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::trim);

    Some(CandidateCondition {
        condition: condition.to_string(),
        confidence,
        explanation: text("explanation").unwrap_or_default().to_string(),
        urgency: text("urgency").map_or(UrgencyTier::Routine, UrgencyTier::from_model_tag),
        specialty: text("specialty")
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SPECIALTY)
            .to_string(),
    })
}

/// Integer, float, or numeric string with an optional `%`; clamped to 0-100.
fn parse_confidence(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(0.0, 100.0) as u8)
}

/// Keep non-empty string entries; anything else is skipped.
fn string_list(items: Option<Value>) -> Vec<String> {
    array(items)
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
        .collect()
}
