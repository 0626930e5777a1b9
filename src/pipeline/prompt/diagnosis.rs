use super::sanitize::sanitize_for_prompt;
use crate::models::{PatientContext, PLACEHOLDER_SYMPTOMS};

/// System instruction for text-only differential diagnosis.
pub const TEXT_DIAGNOSIS_SYSTEM_PROMPT: &str = "You are an expert medical AI assistant specializing in differential diagnosis and clinical assessment. You have comprehensive knowledge of internal medicine, family medicine, and clinical decision-making. Always respond with valid JSON only, providing evidence-based medical reasoning.";

/// System instruction when an image travels with the prompt.
pub const VISION_DIAGNOSIS_SYSTEM_PROMPT: &str = "You are an expert medical AI with advanced visual diagnostic capabilities. You have extensive knowledge of dermatology, radiology, and clinical photography interpretation. Always respond with valid JSON only, providing comprehensive differential diagnosis with clinical reasoning.";

const OUTPUT_SCHEMA: &str = r#"{
  "diagnoses": [
    {
      "condition": "Most Likely Condition Name",
      "confidence": 75,
      "explanation": "3-4 sentence clinical reasoning that SPECIFICALLY references: 1) Key symptoms mentioned, 2) Timeline/progression patterns, 3) Relevant patient factors (age/gender/history), 4) Why this fits better than alternatives",
      "urgency": "routine|soon|urgent",
      "specialty": "Primary Care|Cardiology|Gastroenterology|etc"
    },
    {
      "condition": "Second Differential Diagnosis",
      "confidence": 55,
      "explanation": "2-3 sentences explaining: 1) What symptoms support this diagnosis, 2) What makes it less likely than #1, 3) What additional findings would confirm/rule out",
      "urgency": "routine|soon|urgent",
      "specialty": "Primary Care|Specialist Type"
    },
    {
      "condition": "Third Possibility",
      "confidence": 35,
      "explanation": "2 sentences on: 1) Why this is being considered, 2) What key features are missing or present",
      "urgency": "routine|soon|urgent",
      "specialty": "Primary Care|Specialist Type"
    }
  ],
  "red_flags": ["List SPECIFIC concerning symptoms from interview that require immediate attention - be explicit"],
  "additional_questions": ["Despite thorough interview, list 2-3 remaining questions that would help confirm/rule out top diagnoses"],
  "recommended_tests": ["Specific diagnostic tests relevant to top 2-3 diagnoses - include WHY each test would be helpful"]
}"#;

/// Narrative as it goes into the prompt: sanitized, never empty.
pub fn prompt_narrative(patient: &PatientContext) -> String {
    let cleaned = sanitize_for_prompt(&patient.narrative(), "symptoms");
    if cleaned.is_empty() {
        PLACEHOLDER_SYMPTOMS.to_string()
    } else {
        cleaned
    }
}

/// Build the fixed-schema differential diagnosis prompt.
///
/// The 70-95 / 40-69 / 20-39 confidence bands are guidance to the model
/// only. Banding of the returned scores happens during synthesis.
pub fn build_diagnosis_prompt(patient: &PatientContext) -> String {
    let age = patient.age();
    let gender = sanitize_for_prompt(patient.gender(), "gender");
    let narrative = prompt_narrative(patient);

    format!(
        r#"You are an expert medical diagnostician with years of clinical experience. You've just conducted a THOROUGH medical interview and gathered comprehensive information. Now perform a complete differential diagnosis analysis.

PATIENT INFORMATION:
- Age: {age} years
- Gender: {gender}

COMPLETE MEDICAL INTERVIEW DATA:
{narrative}

CRITICAL INSTRUCTIONS - READ CAREFULLY:
1. ANALYZE ALL information from the complete interview above - every detail matters
2. Look for PATTERNS and CONNECTIONS between symptoms, timeline, triggers, and patient history
3. Consider AGE and GENDER specific conditions
4. Evaluate SEVERITY and URGENCY based on symptom progression and red flags
5. Provide confidence scores based on:
   - Specificity of symptom patterns
   - Alignment with typical disease presentations
   - Presence/absence of key diagnostic features
   - Patient's age, gender, and medical history
6. Include both COMMON and IMPORTANT UNCOMMON conditions
7. Base your clinical reasoning on the ACTUAL information provided - be specific

DIFFERENTIAL DIAGNOSIS REQUIREMENTS:
- List 3-5 most likely conditions ranked by probability
- Higher confidence (70-95%) only if symptoms strongly match a specific condition
- Medium confidence (40-69%) for conditions that fit but lack definitive features
- Lower confidence (20-39%) for less likely possibilities worth considering
- Provide DETAILED clinical reasoning that references specific information from the interview

Respond ONLY in valid JSON format with this exact structure:

{OUTPUT_SCHEMA}

IMPORTANT GUIDELINES:
- Confidence scores should reflect clinical likelihood (0-100)
- Consider age-specific conditions (pediatric vs adult vs geriatric)
- Factor in gender-specific conditions when relevant
- Include urgency assessment (routine, soon, urgent)
- Suggest appropriate medical specialty for follow-up
- Identify red flag symptoms requiring immediate attention
- Recommend relevant diagnostic questions and tests

Respond with ONLY JSON - no other text or explanations outside the JSON structure."#
    )
}
