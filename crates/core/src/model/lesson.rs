use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{LessonId, QuestionId};
use crate::model::question::{Question, QuestionDraft, QuestionError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson id cannot be empty")]
    EmptyId,

    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson has no questions")]
    NoQuestions,

    #[error("duplicate question id: {0}")]
    DuplicateQuestion(QuestionId),

    #[error("question #{position}: {source}")]
    Question {
        position: usize,
        #[source]
        source: QuestionError,
    },
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// Lesson as stored in a lesson file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDraft {
    pub id: String,
    pub title: String,
    #[serde(default, rename = "skill")]
    pub skill_name: String,
    pub questions: Vec<QuestionDraft>,
}

impl LessonDraft {
    /// # Errors
    ///
    /// Returns `LessonError::Question` with the 1-based position of the first
    /// invalid question, or any error from `Lesson::new`.
    pub fn validate(self) -> Result<Lesson, LessonError> {
        let id = LessonId::new(self.id).map_err(|_| LessonError::EmptyId)?;
        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(i, q)| {
                q.validate().map_err(|source| LessonError::Question {
                    position: i + 1,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Lesson::new(id, self.title, self.skill_name, questions)
    }
}

/// An ordered, non-empty list of questions with display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lesson {
    id: LessonId,
    title: String,
    skill_name: String,
    questions: Vec<Question>,
}

impl Lesson {
    /// # Errors
    ///
    /// Returns `LessonError` if the title is blank, the question list is empty,
    /// or two questions share an id.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        skill_name: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(LessonError::NoQuestions);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for q in &questions {
            if !seen.insert(q.id()) {
                return Err(LessonError::DuplicateQuestion(q.id().clone()));
            }
        }

        Ok(Self {
            id,
            title,
            skill_name: skill_name.into(),
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn skill_name(&self) -> &str {
        &self.skill_name
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a validated lesson.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Returns a copy of this lesson with the questions in a new order.
    ///
    /// `order` must be a permutation of `0..len`; anything else leaves the
    /// lesson unchanged.
    #[must_use]
    pub fn reordered(&self, order: &[usize]) -> Self {
        let mut check: Vec<usize> = order.to_vec();
        check.sort_unstable();
        if check != (0..self.questions.len()).collect::<Vec<_>>() {
            return self.clone();
        }

        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            skill_name: self.skill_name.clone(),
            questions: order.iter().map(|&i| self.questions[i].clone()).collect(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
