use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("multiple choice question needs at least 2 options, got {count}")]
    TooFewOptions { count: usize },

    #[error("option {index} has no text")]
    EmptyOption { index: usize },

    #[error("correct option {index} is out of range for {count} options")]
    CorrectOutOfRange { index: usize, count: usize },
}

//
// ─── OPTION INDEX ──────────────────────────────────────────────────────────────
//

/// Position of an option within a question's ordered option list.
///
/// Answers are always compared by index, never by option text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionIndex(usize);

impl OptionIndex {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }

    /// Display label for the option: `A`, `B`, `C`, ...
    ///
    /// Falls back to `?` past `Z`.
    #[must_use]
    pub fn letter(self) -> char {
        u8::try_from(self.0)
            .ok()
            .filter(|i| *i < 26)
            .map_or('?', |i| char::from(b'A' + i))
    }

    /// Parses an option label typed by a user: a letter (`a`/`A`) or a
    /// 1-based number.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if let Ok(n) = label.parse::<usize>() {
            return n.checked_sub(1).map(Self);
        }
        let mut chars = label.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                Some(Self(usize::from(c.to_ascii_uppercase() as u8 - b'A')))
            }
            _ => None,
        }
    }
}

impl fmt::Debug for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionIndex({})", self.0)
    }
}

impl fmt::Display for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

//
// ─── QUESTION KIND ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum QuestionKind {
    /// Single-select multiple choice.
    #[serde(rename = "mcq")]
    MultipleChoice,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Unvalidated question as it appears in a lesson file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub id: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: QuestionKind,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: usize,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub hint: String,
}

fn default_kind() -> QuestionKind {
    QuestionKind::MultipleChoice
}

impl QuestionDraft {
    /// Validates the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for a blank id or prompt, fewer than two options,
    /// a blank option, or a correct index that points past the option list.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id = QuestionId::new(self.id).map_err(|_| QuestionError::EmptyId)?;
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        match self.kind {
            QuestionKind::MultipleChoice => {
                let count = self.options.len();
                if count < 2 {
                    return Err(QuestionError::TooFewOptions { count });
                }
                if let Some(index) = self.options.iter().position(|o| o.trim().is_empty()) {
                    return Err(QuestionError::EmptyOption { index });
                }
                if self.correct >= count {
                    return Err(QuestionError::CorrectOutOfRange {
                        index: self.correct,
                        count,
                    });
                }
            }
        }

        Ok(Question {
            id,
            kind: self.kind,
            prompt: self.prompt,
            options: self.options,
            correct: OptionIndex::new(self.correct),
            explanation: self.explanation,
            hint: self.hint,
        })
    }
}

/// A validated lesson question. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    kind: QuestionKind,
    prompt: String,
    options: Vec<String>,
    correct: OptionIndex,
    explanation: String,
    hint: String,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: OptionIndex) -> Option<&str> {
        self.options.get(index.value()).map(String::as_str)
    }

    #[must_use]
    pub fn correct(&self) -> OptionIndex {
        self.correct
    }

    #[must_use]
    pub fn is_correct(&self, answer: OptionIndex) -> bool {
        answer == self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
