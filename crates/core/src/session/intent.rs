use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::OptionIndex;

/// A learner action forwarded by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "option", rename_all = "snake_case")]
pub enum Intent {
    Select(OptionIndex),
    Submit,
    Hint,
    Advance,
}

/// Precondition violation: the intent is not valid in the current state.
///
/// A rejected intent leaves the session untouched and emits nothing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum IntentError {
    #[error("answer already revealed for this question")]
    AlreadyRevealed,

    #[error("no answer selected")]
    NoSelection,

    #[error("answer not revealed yet")]
    NotRevealed,

    #[error("lesson already complete")]
    SessionComplete,

    #[error("option {index} does not exist ({count} options)")]
    OptionOutOfRange { index: usize, count: usize },
}

/// Evaluation returned by a successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub selected: OptionIndex,
    pub correct_option: OptionIndex,
    pub is_correct: bool,
    pub xp_awarded: u32,
    pub hearts_lost: u32,
    pub explanation: String,
}

/// Result of a hint request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HintOutcome {
    pub hint: String,
    pub hearts_charged: u32,
    /// True when the hint was already visible and nothing was charged.
    pub already_shown: bool,
}

/// Where `advance` left the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "to", rename_all = "snake_case")]
pub enum Advance {
    NextQuestion { index: usize },
    Complete { final_score: u32 },
}

/// Successful result of any intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntentOutcome {
    Selected { option: OptionIndex },
    Answered(AnswerOutcome),
    Hint(HintOutcome),
    Advanced(Advance),
}
