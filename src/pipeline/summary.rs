//! Plaintext assessment text returned alongside the structured result.

use crate::models::{ModelDiagnosis, PatientContext, Recommendation, UrgencyTier};

const COMPLAINT_PREVIEW_CHARS: usize = 800;
const REASONING_PREVIEW_CHARS: usize = 500;
const MAX_LISTED_CAUSES: usize = 5;
const MAX_LISTED_CONDITIONS: usize = 3;

pub const DISCLAIMER: &str = "Disclaimer: This AI-generated assessment is for informational purposes only and not a substitute for professional medical care. In emergencies, call local emergency services.";

pub const BASIC_ASSESSMENT_NOTE: &str = "Note: This is a basic assessment. For accurate diagnosis and treatment, please consult with a qualified healthcare professional.";

/// Compact assessment built from model output.
pub fn model_answer(
    patient: &PatientContext,
    diagnosis: &ModelDiagnosis,
    recommendations: &[Recommendation],
    urgency: UrgencyTier,
) -> String {
    let mut lines: Vec<String> = vec![
        "AI Medical Assessment".into(),
        "---------------------".into(),
        format!("Age: {} years | Gender: {}", patient.age(), patient.gender()),
        format!(
            "Chief complaint: {}",
            preview(&patient.narrative(), COMPLAINT_PREVIEW_CHARS)
        ),
    ];

    if !diagnosis.red_flags.is_empty() {
        lines.push(String::new());
        lines.push("Warning signs identified:".into());
        lines.extend(diagnosis.red_flags.iter().map(|f| format!("- {f}")));
        lines.push(
            "Recommendation: Seek immediate medical evaluation for these warning signs.".into(),
        );
    }

    if !diagnosis.diagnoses.is_empty() {
        lines.push(String::new());
        lines.push("Differential diagnosis:".into());
        for (i, c) in diagnosis.diagnoses.iter().take(MAX_LISTED_CAUSES).enumerate() {
            lines.push(format!(
                "{}. {} - Confidence: {}% - Urgency: {} - Specialty: {}",
                i + 1,
                c.condition,
                c.confidence,
                c.urgency,
                c.specialty
            ));
            let reasoning = if c.explanation.trim().is_empty() {
                "No explanation provided".to_string()
            } else {
                preview(c.explanation.trim(), REASONING_PREVIEW_CHARS)
            };
            lines.push(format!("   Clinical reasoning: {reasoning}"));
        }
    }

    push_list(&mut lines, "Additional information needed:", &diagnosis.additional_questions);
    push_list(&mut lines, "Suggested diagnostic tests:", &diagnosis.recommended_tests);

    if !recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Clinical recommendations:".into());
        lines.extend(
            recommendations
                .iter()
                .map(|r| format!("- {}: {}", r.title, r.description)),
        );
    }

    lines.push(String::new());
    lines.push(urgency_line(urgency));

    if let Some(top) = diagnosis.diagnoses.iter().map(|c| c.confidence).max() {
        lines.push(String::new());
        lines.push("Assessment summary:".into());
        lines.push(format!("- Diagnoses considered: {}", diagnosis.diagnoses.len()));
        lines.push(format!("- Highest confidence: {top}%"));
        lines.push(format!("- Warning signs count: {}", diagnosis.red_flags.len()));
    }

    lines.push(String::new());
    lines.push(DISCLAIMER.into());
    lines.join("\n")
}

/// Assessment text for the keyword fallback path.
pub fn fallback_answer(
    patient: &PatientContext,
    likely_conditions: &[String],
    recommendations: &[Recommendation],
) -> String {
    let mut lines: Vec<String> = vec![
        "# Medical Assessment".into(),
        String::new(),
        format!("**Symptoms Analyzed:** {}", patient.narrative()),
        String::new(),
        "**Patient Information:**".into(),
        format!("- Age: {} years", patient.age()),
        format!("- Gender: {}", patient.gender()),
        String::new(),
        "## Preliminary Assessment".into(),
        String::new(),
        "Based on your symptoms, the following conditions may be relevant:".into(),
        String::new(),
    ];
    lines.extend(
        likely_conditions
            .iter()
            .take(MAX_LISTED_CONDITIONS)
            .map(|c| format!("- {c}")),
    );

    lines.push(String::new());
    lines.push("## General Recommendations".into());
    lines.push(String::new());
    lines.extend(
        recommendations
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. **{}**: {}", i + 1, r.title, r.description)),
    );

    lines.push(String::new());
    lines.push(format!("**{BASIC_ASSESSMENT_NOTE}**"));
    lines.join("\n")
}

fn urgency_line(urgency: UrgencyTier) -> String {
    let label = match urgency {
        UrgencyTier::Urgent => "URGENT",
        UrgencyTier::Soon => "Soon",
        UrgencyTier::Routine => "Routine",
    };
    format!("Urgency: {label} - {}", urgency.guidance())
}

fn push_list(lines: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(heading.to_string());
    lines.extend(items.iter().map(|item| format!("- {item}")));
}

/// First `max_chars` characters, with "..." appended when cut.
fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandidateCondition;

    fn patient(symptoms: &str) -> PatientContext {
        PatientContext::new(54, "male", symptoms).unwrap()
    }

    fn diagnosis() -> ModelDiagnosis {
        ModelDiagnosis {
            diagnoses: vec![
                CandidateCondition {
                    condition: "Angina".into(),
                    confidence: 65,
                    explanation: "Exertional chest tightness".into(),
                    urgency: UrgencyTier::Urgent,
                    specialty: "Cardiology".into(),
                },
                CandidateCondition {
                    condition: "GERD".into(),
                    confidence: 40,
                    explanation: String::new(),
                    urgency: UrgencyTier::Routine,
                    specialty: "Gastroenterology".into(),
                },
            ],
            red_flags: vec!["Chest pain on exertion".into()],
            additional_questions: vec!["Does rest relieve it?".into()],
            recommended_tests: vec!["ECG".into()],
        }
    }

    #[test]
    fn model_answer_sections() {
        let text = model_answer(
            &patient("Chest tightness when climbing stairs"),
            &diagnosis(),
            &[Recommendation::new("Symptom Monitoring", "Keep a log")],
            UrgencyTier::Urgent,
        );
        assert!(text.starts_with("AI Medical Assessment"));
        assert!(text.contains("Age: 54 years | Gender: male"));
        assert!(text.contains("Chief complaint: Chest tightness when climbing stairs"));
        assert!(text.contains("Warning signs identified:\n- Chest pain on exertion"));
        assert!(text.contains(
            "1. Angina - Confidence: 65% - Urgency: urgent - Specialty: Cardiology"
        ));
        assert!(text.contains("   Clinical reasoning: No explanation provided"));
        assert!(text.contains("Additional information needed:\n- Does rest relieve it?"));
        assert!(text.contains("Suggested diagnostic tests:\n- ECG"));
        assert!(text.contains("- Symptom Monitoring: Keep a log"));
        assert!(text.contains("Urgency: URGENT - Seek immediate medical attention"));
        assert!(text.contains("- Diagnoses considered: 2"));
        assert!(text.contains("- Highest confidence: 65%"));
        assert!(text.contains("- Warning signs count: 1"));
        assert!(text.ends_with(DISCLAIMER));
    }

    #[test]
    fn long_complaint_previewed() {
        let text = model_answer(
            &patient(&"x".repeat(1000)),
            &ModelDiagnosis::default(),
            &[],
            UrgencyTier::Routine,
        );
        let line = text
            .lines()
            .find(|l| l.starts_with("Chief complaint:"))
            .unwrap();
        assert_eq!(line.len(), "Chief complaint: ".len() + 800 + 3);
        assert!(!text.contains("Assessment summary:"));
    }

    #[test]
    fn long_reasoning_trimmed() {
        let mut d = diagnosis();
        d.diagnoses[0].explanation = "word ".repeat(200);
        let text = model_answer(&patient("pain"), &d, &[], UrgencyTier::Soon);
        assert!(text.contains("...\n"));
        assert!(text.contains("Urgency: Soon - Schedule an appointment within 24-48 hours."));
    }

    #[test]
    fn fallback_answer_lists_conditions_and_steps() {
        let recs = vec![
            Recommendation::new("Monitor symptoms", "Monitor symptoms and note any changes"),
            Recommendation::new("Stay hydrated", "Stay hydrated with plenty of fluids"),
        ];
        let text = fallback_answer(
            &patient("headache and nausea"),
            &["Headache disorder".into(), "Gastrointestinal issue".into()],
            &recs,
        );
        assert!(text.starts_with("# Medical Assessment"));
        assert!(text.contains("**Symptoms Analyzed:** headache and nausea"));
        assert!(text.contains("- Age: 54 years"));
        assert!(text.contains("- Headache disorder\n- Gastrointestinal issue"));
        assert!(text.contains("1. **Monitor symptoms**: Monitor symptoms and note any changes"));
        assert!(text.contains("2. **Stay hydrated**"));
        assert!(text.ends_with(&format!("**{BASIC_ASSESSMENT_NOTE}**")));
    }
}
