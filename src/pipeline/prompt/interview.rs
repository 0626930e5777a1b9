use super::diagnosis::prompt_narrative;
use super::sanitize::sanitize_for_prompt;
use crate::models::{InterviewState, PatientContext};

/// System instruction for interview-question generation.
pub const INTERVIEW_SYSTEM_PROMPT: &str = "You are an expert medical interviewer. Generate relevant, specific follow-up questions based on patient symptoms.";

/// Build the prompt for the next interview question.
///
/// Embeds the focus area for `state.turn_index`, the last eight log
/// entries, and every previously asked question with an instruction not to
/// repeat any of them.
pub fn build_interview_prompt(
    patient: &PatientContext,
    state: &InterviewState,
    total_turns: u32,
) -> String {
    let number = state.turn_index.saturating_add(1);
    let total = total_turns.max(number);
    let age = patient.age();
    let gender = sanitize_for_prompt(patient.gender(), "gender");
    let complaint = prompt_narrative(patient);
    let focus = state.focus().instruction();

    let history = state
        .recent_history()
        .iter()
        .map(|entry| sanitize_for_prompt(entry, "history"))
        .filter(|entry| !entry.is_empty())
        .map(|entry| format!("- {entry}"))
        .collect::<Vec<_>>()
        .join("\n");

    let asked = if state.previous_questions.is_empty() {
        String::new()
    } else {
        let list = state
            .previous_questions
            .iter()
            .map(|q| format!("- {}", sanitize_for_prompt(q, "previous_questions")))
            .collect::<Vec<_>>()
            .join("\n");
        format!("\n\nQuestions already asked (DO NOT repeat these):\n{list}")
    };

    format!(
        r#"You are an expert medical doctor conducting a thorough patient interview. This is question {number} of {total} in a comprehensive medical assessment.

Patient Information:
- Age: {age}
- Gender: {gender}
- Chief Complaint: {complaint}

Conversation so far:
{history}{asked}

{focus}

CRITICAL REQUIREMENTS for your question:
1. Must be HIGHLY SPECIFIC to their symptoms and situation
2. Should gather CLINICALLY RELEVANT information for differential diagnosis
3. Must be COMPLETELY DIFFERENT from any previously asked questions
4. Should be CLEAR and EASY for a patient to understand and answer
5. Should dig DEEPER into important medical details
6. Must help narrow down possible conditions
7. Should cover the specific focus area mentioned above

IMPORTANT:
- Do NOT ask yes/no questions - ask open-ended questions that get detailed information
- Do NOT ask generic questions - tailor specifically to their symptoms
- Do NOT repeat anything already covered
- Make the question conversational but professional

Generate ONE well-crafted medical interview question that follows all these requirements.

Return ONLY the question text, nothing else."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FocusArea;

    fn patient() -> PatientContext {
        PatientContext::new(35, "male", "Sharp pain in lower right abdomen").unwrap()
    }

    #[test]
    fn first_turn_is_timeline_focused() {
        let prompt = build_interview_prompt(&patient(), &InterviewState::new(), 10);
        assert!(prompt.contains("This is question 1 of 10"));
        assert!(prompt.contains(FocusArea::Timeline.instruction()));
        assert!(!prompt.contains("Questions already asked"));
    }

    #[test]
    fn late_turn_uses_clarifications() {
        let state = InterviewState {
            turn_index: 12,
            ..Default::default()
        };
        let prompt = build_interview_prompt(&patient(), &state, 10);
        assert!(prompt.contains(FocusArea::Clarifications.instruction()));
        assert!(prompt.contains("This is question 13 of 13"));
    }

    #[test]
    fn previous_questions_listed() {
        let state = InterviewState::new()
            .advance("When did the pain start?")
            .with_answer("Yesterday evening");
        let prompt = build_interview_prompt(&patient(), &state, 10);
        assert!(prompt.contains("Questions already asked (DO NOT repeat these):\n- When did the pain start?"));
        assert!(prompt.contains("- Doctor: When did the pain start?"));
        assert!(prompt.contains("- Patient: Yesterday evening"));
        assert!(prompt.contains(FocusArea::Severity.instruction()));
    }

    #[test]
    fn only_last_eight_history_entries_embedded() {
        let state = InterviewState {
            turn_index: 5,
            conversation_history: (0..10).map(|i| format!("entry number {i}")).collect(),
            ..Default::default()
        };
        let prompt = build_interview_prompt(&patient(), &state, 10);
        assert!(!prompt.contains("entry number 1\n"));
        assert!(prompt.contains("- entry number 2"));
        assert!(prompt.contains("- entry number 9"));
    }

    #[test]
    fn prompt_forbids_yes_no_and_repeats() {
        let prompt = build_interview_prompt(&patient(), &InterviewState::new(), 10);
        assert!(prompt.contains("Do NOT ask yes/no questions"));
        assert!(prompt.contains("Do NOT repeat anything already covered"));
        assert!(prompt.ends_with("Return ONLY the question text, nothing else."));
    }

    #[test]
    fn chief_complaint_embedded() {
        let prompt = build_interview_prompt(&patient(), &InterviewState::new(), 10);
        assert!(prompt.contains("- Chief Complaint: Sharp pain in lower right abdomen"));
        assert!(prompt.contains("- Age: 35"));
    }
}
