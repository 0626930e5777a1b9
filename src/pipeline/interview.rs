use crate::models::{InterviewState, InterviewStep, PatientContext, ResultSource};
use crate::pipeline::inference::ModelInvoker;
use crate::pipeline::prompt::build_interview_prompt;

/// Asked whenever the model cannot supply a question.
pub const FALLBACK_QUESTION: &str =
    "Can you tell me more about when these symptoms started and if anything makes them better or worse?";

/// Drives the bounded interview: one question per call, state owned by the caller.
pub struct InterviewController<'a> {
    invoker: &'a ModelInvoker,
    total_turns: u32,
}

impl<'a> InterviewController<'a> {
    pub fn new(invoker: &'a ModelInvoker, total_turns: u32) -> Self {
        Self {
            invoker,
            total_turns,
        }
    }

    /// Produce the question for `state.turn_index` and the advanced state.
    ///
    /// Never fails: an unavailable model or an unusable reply yields
    /// [`FALLBACK_QUESTION`]. A repeated question is accepted as-is.
    pub fn next_question(&self, patient: &PatientContext, state: InterviewState) -> InterviewStep {
        let turn_index = state.turn_index;
        let focus = state.focus();
        let span = tracing::info_span!("next_question", turn_index, focus = %focus);
        let _enter = span.enter();

        let prompt = build_interview_prompt(patient, &state, self.total_turns);
        let (question, source) = match self.invoker.ask_interview(&prompt) {
            Ok(raw) => match clean_question(&raw) {
                Some(q) => (q, ResultSource::Model),
                None => {
                    tracing::warn!("Model reply held no usable question");
                    (FALLBACK_QUESTION.to_string(), ResultSource::Fallback)
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Using fallback interview question");
                (FALLBACK_QUESTION.to_string(), ResultSource::Fallback)
            }
        };

        if state.has_asked(&question) {
            tracing::debug!("Question repeats an earlier turn");
        }

        tracing::info!(source = %source, "Interview question ready");
        let state = state.advance(&question);
        InterviewStep {
            question,
            focus,
            turn_index,
            source,
            state,
        }
    }
}

/// Strip surrounding quotes and a leading "Question:" label.
pub fn clean_question(raw: &str) -> Option<String> {
    let mut text = raw.trim();

    const LABEL: &str = "question:";
    if text
        .get(..LABEL.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(LABEL))
    {
        text = text[LABEL.len()..].trim_start();
    }

    let quotes: &[char] = &['"', '\'', '\u{201C}', '\u{201D}', '`'];
    text = text.trim_matches(quotes).trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
