use chrono::{DateTime, Utc};
use std::fmt;

use crate::model::{
    AnswerTally, Lesson, LessonSummary, LessonSummaryError, OptionIndex, Question,
    SessionId, SessionSettings,
};
use crate::notify::{Notification, NotificationSink};
use crate::time::Clock;

use super::intent::{Advance, AnswerOutcome, HintOutcome, Intent, IntentError, IntentOutcome};
use super::snapshot::SessionSnapshot;

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Sub-state of the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionPhase {
    Unanswered,
    Pending(OptionIndex),
    Revealed { selected: OptionIndex, correct: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Complete,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One run through a lesson's questions.
///
/// Owns question progression, the heart and XP economy, and per-question
/// interaction state. The only mutators are the four intents
/// (`select_answer`, `submit`, `request_hint`, `advance`); every rejected
/// intent returns an `IntentError` and leaves the session unchanged.
///
/// Hearts may reach zero or go negative through wrong answers; the session
/// keeps going.
pub struct LessonSession {
    id: SessionId,
    lesson: Lesson,
    settings: SessionSettings,
    clock: Clock,
    current: usize,
    selected: Option<OptionIndex>,
    revealed: bool,
    hint_shown: bool,
    score: u32,
    hearts: i32,
    status: SessionStatus,
    tally: AnswerTally,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl LessonSession {
    /// Starts a session at the first question with the configured hearts.
    #[must_use]
    pub fn start(lesson: Lesson, settings: SessionSettings, clock: Clock) -> Self {
        Self {
            id: SessionId::generate(),
            hearts: i32::try_from(settings.starting_hearts()).unwrap_or(i32::MAX),
            lesson,
            settings,
            clock,
            current: 0,
            selected: None,
            revealed: false,
            hint_shown: false,
            score: 0,
            status: SessionStatus::InProgress,
            tally: AnswerTally::default(),
            started_at: clock.now(),
            completed_at: None,
        }
    }

    //
    // ─── INTENTS ──────────────────────────────────────────────────────────────
    //

    /// Dispatches an intent to the matching operation.
    ///
    /// # Errors
    ///
    /// Returns the `IntentError` of the rejected operation.
    pub fn apply(
        &mut self,
        intent: Intent,
        sink: &mut dyn NotificationSink,
    ) -> Result<IntentOutcome, IntentError> {
        match intent {
            Intent::Select(option) => self
                .select_answer(option)
                .map(|()| IntentOutcome::Selected { option }),
            Intent::Submit => self.submit(sink).map(IntentOutcome::Answered),
            Intent::Hint => self.request_hint().map(IntentOutcome::Hint),
            Intent::Advance => self.advance(sink).map(IntentOutcome::Advanced),
        }
    }

    /// Selects (or re-selects) an option for the current question.
    ///
    /// # Errors
    ///
    /// `AlreadyRevealed` after submit, `SessionComplete` after the last
    /// question, `OptionOutOfRange` for an index past the option list.
    pub fn select_answer(&mut self, option: OptionIndex) -> Result<(), IntentError> {
        self.ensure_in_progress()?;
        if self.revealed {
            return Err(IntentError::AlreadyRevealed);
        }
        let count = self.current_question().options().len();
        if option.value() >= count {
            return Err(IntentError::OptionOutOfRange {
                index: option.value(),
                count,
            });
        }

        self.selected = Some(option);
        Ok(())
    }

    /// Reveals the pending selection and scores it.
    ///
    /// Correct: `score += xp_per_correct` and `AnswerCorrect` is emitted.
    /// Wrong: one heart is lost and `AnswerIncorrect` is emitted.
    ///
    /// # Errors
    ///
    /// `NoSelection` without a selection, `AlreadyRevealed` on a second submit.
    pub fn submit(
        &mut self,
        sink: &mut dyn NotificationSink,
    ) -> Result<AnswerOutcome, IntentError> {
        self.ensure_in_progress()?;
        if self.revealed {
            return Err(IntentError::AlreadyRevealed);
        }
        let selected = self.selected.ok_or(IntentError::NoSelection)?;

        let question = &self.lesson.questions()[self.current];
        let is_correct = question.is_correct(selected);
        let outcome = AnswerOutcome {
            selected,
            correct_option: question.correct(),
            is_correct,
            xp_awarded: if is_correct {
                self.settings.xp_per_correct()
            } else {
                0
            },
            hearts_lost: u32::from(!is_correct),
            explanation: question.explanation().to_string(),
        };

        self.revealed = true;
        if is_correct {
            self.score = self.score.saturating_add(outcome.xp_awarded);
            self.tally.correct += 1;
            sink.notify(Notification::AnswerCorrect {
                xp: outcome.xp_awarded,
            });
        } else {
            self.hearts -= 1;
            self.tally.incorrect += 1;
            sink.notify(Notification::AnswerIncorrect);
        }

        Ok(outcome)
    }

    /// Shows the hint for the current question.
    ///
    /// The first request per question charges `hint_cost` hearts, but never
    /// below `hint_floor`. Repeat requests are free.
    ///
    /// # Errors
    ///
    /// `AlreadyRevealed` once the answer is shown.
    pub fn request_hint(&mut self) -> Result<HintOutcome, IntentError> {
        self.ensure_in_progress()?;
        if self.revealed {
            return Err(IntentError::AlreadyRevealed);
        }

        let hint = self.current_question().hint().to_string();
        if self.hint_shown {
            return Ok(HintOutcome {
                hint,
                hearts_charged: 0,
                already_shown: true,
            });
        }

        let floor = i64::from(self.settings.hint_floor());
        let available = (i64::from(self.hearts) - floor).max(0);
        let charged = i64::from(self.settings.hint_cost()).min(available);

        self.hint_shown = true;
        self.tally.hints_used += 1;
        // charged <= hearts - floor, so it fits in i32.
        self.hearts -= i32::try_from(charged).unwrap_or(0);

        Ok(HintOutcome {
            hint,
            hearts_charged: u32::try_from(charged).unwrap_or(0),
            already_shown: false,
        })
    }

    /// Moves past a revealed question.
    ///
    /// On the last question the session completes and `LessonComplete` is
    /// emitted with the final score.
    ///
    /// # Errors
    ///
    /// `NotRevealed` before submit, `SessionComplete` after completion.
    pub fn advance(&mut self, sink: &mut dyn NotificationSink) -> Result<Advance, IntentError> {
        self.ensure_in_progress()?;
        if !self.revealed {
            return Err(IntentError::NotRevealed);
        }

        if self.is_last_question() {
            self.status = SessionStatus::Complete;
            self.completed_at = Some(self.clock.now().max(self.started_at));
            sink.notify(Notification::LessonComplete {
                final_score: self.score,
            });
            return Ok(Advance::Complete {
                final_score: self.score,
            });
        }

        self.current += 1;
        self.selected = None;
        self.revealed = false;
        self.hint_shown = false;
        Ok(Advance::NextQuestion {
            index: self.current,
        })
    }

    fn ensure_in_progress(&self) -> Result<(), IntentError> {
        match self.status {
            SessionStatus::InProgress => Ok(()),
            SessionStatus::Complete => Err(IntentError::SessionComplete),
        }
    }

    //
    // ─── QUERIES ──────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// The question being shown. After completion this stays on the last one.
    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.lesson.questions()[self.current]
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.lesson.len()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 == self.lesson.len()
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<OptionIndex> {
        self.selected
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn is_hint_shown(&self) -> bool {
        self.hint_shown
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn hearts(&self) -> i32 {
        self.hearts
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Complete
    }

    #[must_use]
    pub fn tally(&self) -> AnswerTally {
        self.tally
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// `(current_index + 1) / total * 100`. Display only.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f64 {
        (self.current + 1) as f64 / self.lesson.len() as f64 * 100.0
    }

    #[must_use]
    pub fn phase(&self) -> QuestionPhase {
        match (self.selected, self.revealed) {
            (None, _) => QuestionPhase::Unanswered,
            (Some(selected), false) => QuestionPhase::Pending(selected),
            (Some(selected), true) => QuestionPhase::Revealed {
                selected,
                correct: self.current_question().is_correct(selected),
            },
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self)
    }

    /// Builds the summary of a completed session.
    ///
    /// Returns `None` while the session is still in progress.
    ///
    /// # Errors
    ///
    /// Returns `LessonSummaryError` if the collected counters are inconsistent.
    pub fn summary(&self) -> Option<Result<LessonSummary, LessonSummaryError>> {
        let completed_at = self.completed_at?;
        let total = u32::try_from(self.lesson.len()).unwrap_or(u32::MAX);
        Some(LessonSummary::new(
            self.lesson.id().clone(),
            self.id,
            self.started_at,
            completed_at,
            total,
            self.tally,
            self.score,
            self.hearts,
        ))
    }
}

impl fmt::Debug for LessonSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonSession")
            .field("id", &self.id)
            .field("lesson_id", self.lesson.id())
            .field("questions_len", &self.lesson.len())
            .field("current", &self.current)
            .field("selected", &self.selected)
            .field("revealed", &self.revealed)
            .field("hint_shown", &self.hint_shown)
            .field("score", &self.score)
            .field("hearts", &self.hearts)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
