use serde::Serialize;

use crate::model::OptionIndex;

use super::state::LessonSession;

/// How an option should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionState {
    Idle,
    Selected,
    /// The right answer, after reveal.
    Correct,
    /// The learner's wrong pick, after reveal.
    Incorrect,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub index: OptionIndex,
    pub letter: char,
    pub text: String,
    pub state: OptionState,
}

/// Read-only copy of everything needed to render a lesson screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub lesson_title: String,
    pub question_number: usize,
    pub total_questions: usize,
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub selected: Option<OptionIndex>,
    pub revealed: bool,
    pub hint_shown: bool,
    /// Present only while the hint is shown and the answer is not revealed.
    pub hint: Option<String>,
    /// Present only after reveal.
    pub explanation: Option<String>,
    pub score: u32,
    pub hearts: i32,
    pub max_hearts: u32,
    pub progress_percent: f64,
    pub is_complete: bool,
    pub continue_label: &'static str,
    pub can_submit: bool,
    pub can_hint: bool,
    pub can_advance: bool,
}

impl SessionSnapshot {
    pub(crate) fn capture(session: &LessonSession) -> Self {
        let question = session.current_question();
        let selected = session.selected_answer();
        let revealed = session.is_revealed();
        let hint_shown = session.is_hint_shown();
        let in_progress = !session.is_complete();

        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let index = OptionIndex::new(i);
                let state = match (revealed, selected == Some(index)) {
                    (true, _) if question.is_correct(index) => OptionState::Correct,
                    (true, true) => OptionState::Incorrect,
                    (true, false) => OptionState::Muted,
                    (false, true) => OptionState::Selected,
                    (false, false) => OptionState::Idle,
                };
                OptionView {
                    index,
                    letter: index.letter(),
                    text: text.clone(),
                    state,
                }
            })
            .collect();

        Self {
            lesson_title: session.lesson().title().to_string(),
            question_number: session.current_index() + 1,
            total_questions: session.total_questions(),
            prompt: question.prompt().to_string(),
            options,
            selected,
            revealed,
            hint_shown,
            hint: (hint_shown && !revealed).then(|| question.hint().to_string()),
            explanation: revealed.then(|| question.explanation().to_string()),
            score: session.score(),
            hearts: session.hearts(),
            max_hearts: session.settings().starting_hearts(),
            progress_percent: session.progress_percent(),
            is_complete: session.is_complete(),
            continue_label: if session.is_last_question() {
                "Complete"
            } else {
                "Continue"
            },
            can_submit: in_progress && selected.is_some() && !revealed,
            can_hint: in_progress && !hint_shown && !revealed,
            can_advance: in_progress && revealed,
        }
    }
}
