use serde::{Deserialize, Serialize};

use super::enums::{FocusArea, ResultSource};

/// Number of conversation-log entries the interview prompt embeds.
pub const HISTORY_WINDOW: usize = 8;

/// Interview session state, owned by the caller and resent on every turn.
///
/// Nothing is kept server-side between turns: each call receives this value
/// and hands back the advanced copy inside an [`InterviewStep`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewState {
    /// Zero-based index of the turn about to be asked.
    #[serde(default)]
    pub turn_index: u32,
    #[serde(default)]
    pub previous_questions: Vec<String>,
    #[serde(default)]
    pub conversation_history: Vec<String>,
}

impl InterviewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> FocusArea {
        FocusArea::for_turn(self.turn_index)
    }

    /// Last [`HISTORY_WINDOW`] log entries, oldest first.
    pub fn recent_history(&self) -> &[String] {
        let start = self.conversation_history.len().saturating_sub(HISTORY_WINDOW);
        &self.conversation_history[start..]
    }

    pub fn has_asked(&self, question: &str) -> bool {
        let needle = question.trim();
        self.previous_questions
            .iter()
            .any(|q| q.trim().eq_ignore_ascii_case(needle))
    }

    /// Record the patient's reply to the last question.
    pub fn with_answer(mut self, answer: &str) -> Self {
        self.conversation_history.push(format!("Patient: {}", answer.trim()));
        self
    }

    /// Move to the next turn after `question` has been asked.
    pub fn advance(mut self, question: &str) -> Self {
        self.previous_questions.push(question.to_string());
        self.conversation_history.push(format!("Doctor: {question}"));
        self.turn_index = self.turn_index.saturating_add(1);
        self
    }
}

/// One completed interview turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewStep {
    pub question: String,
    pub focus: FocusArea,
    /// Index of the turn this question belongs to.
    pub turn_index: u32,
    pub source: ResultSource,
    /// State to send back with the patient's answer.
    pub state: InterviewState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_increments_and_records() {
        let state = InterviewState::new().advance("When did it start?");
        assert_eq!(state.turn_index, 1);
        assert_eq!(state.previous_questions, vec!["When did it start?"]);
        assert_eq!(state.conversation_history, vec!["Doctor: When did it start?"]);
    }

    #[test]
    fn answer_appended_to_history() {
        let state = InterviewState::new()
            .advance("When did it start?")
            .with_answer(" Two days ago ");
        assert_eq!(state.conversation_history[1], "Patient: Two days ago");
        assert_eq!(state.turn_index, 1);
    }

    #[test]
    fn recent_history_keeps_last_eight() {
        let state = InterviewState {
            conversation_history: (0..12).map(|i| format!("entry {i}")).collect(),
            ..Default::default()
        };
        let recent = state.recent_history();
        assert_eq!(recent.len(), HISTORY_WINDOW);
        assert_eq!(recent[0], "entry 4");
        assert_eq!(recent[7], "entry 11");
    }

    #[test]
    fn recent_history_short_log_is_whole_log() {
        let state = InterviewState::new().advance("q1");
        assert_eq!(state.recent_history().len(), 1);
    }

    #[test]
    fn has_asked_ignores_case_and_padding() {
        let state = InterviewState::new().advance("How severe is the pain?");
        assert!(state.has_asked("  how severe is the pain?"));
        assert!(!state.has_asked("Where is the pain?"));
    }

    #[test]
    fn focus_follows_turn_index() {
        let state = InterviewState {
            turn_index: 12,
            ..Default::default()
        };
        assert_eq!(state.focus(), FocusArea::Clarifications);
    }

    #[test]
    fn state_deserializes_with_missing_fields() {
        let state: InterviewState = serde_json::from_str(r#"{"turn_index": 3}"#).unwrap();
        assert_eq!(state.turn_index, 3);
        assert!(state.previous_questions.is_empty());
    }
}
