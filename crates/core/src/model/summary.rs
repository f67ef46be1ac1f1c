use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::{LessonId, SessionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("total questions ({total}) does not match answer counts ({sum})")]
    CountMismatch { total: u32, sum: u32 },
}

/// Aggregate result of a completed lesson attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonSummary {
    lesson_id: LessonId,
    session_id: SessionId,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total_questions: u32,
    correct: u32,
    incorrect: u32,
    hints_used: u32,
    final_score: u32,
    hearts_remaining: i32,
}

/// Raw counters collected by a session, before validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerTally {
    pub correct: u32,
    pub incorrect: u32,
    pub hints_used: u32,
}

impl LessonSummary {
    /// # Errors
    ///
    /// Returns `LessonSummaryError::InvalidTimeRange` if `completed_at` is before
    /// `started_at`, or `CountMismatch` if correct + incorrect != total.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lesson_id: LessonId,
        session_id: SessionId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total_questions: u32,
        tally: AnswerTally,
        final_score: u32,
        hearts_remaining: i32,
    ) -> Result<Self, LessonSummaryError> {
        if completed_at < started_at {
            return Err(LessonSummaryError::InvalidTimeRange);
        }
        let sum = tally.correct.saturating_add(tally.incorrect);
        if sum != total_questions {
            return Err(LessonSummaryError::CountMismatch {
                total: total_questions,
                sum,
            });
        }

        Ok(Self {
            lesson_id,
            session_id,
            started_at,
            completed_at,
            total_questions,
            correct: tally.correct,
            incorrect: tally.incorrect,
            hints_used: tally.hints_used,
            final_score,
            hearts_remaining,
        })
    }

    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    #[must_use]
    pub fn final_score(&self) -> u32 {
        self.final_score
    }

    #[must_use]
    pub fn hearts_remaining(&self) -> i32 {
        self.hearts_remaining
    }

    /// Share of questions answered correctly, 0–100.
    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total_questions) * 100.0
    }
}
