use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{SeedableRng, rng};
use tracing::{debug, info};

use lesson_core::model::{LessonId, LessonSummary, SessionSettings};
use lesson_core::notify::{Notification, NotificationSink, NullSink, Tone};
use lesson_core::session::{Advance, Intent, IntentError, IntentOutcome, LessonSession, SessionSnapshot};
use lesson_core::Clock;

use crate::bank::{LessonListing, QuestionBank};
use crate::error::RunnerError;

/// Starts lesson sessions from a question bank and drives them intent by intent.
#[derive(Clone)]
pub struct LessonRunner {
    clock: Clock,
    bank: Arc<dyn QuestionBank>,
    settings: SessionSettings,
    shuffle: bool,
    seed: Option<u64>,
}

impl LessonRunner {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<dyn QuestionBank>) -> Self {
        Self {
            clock,
            bank,
            settings: SessionSettings::default(),
            shuffle: false,
            seed: None,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Shuffle question order when a session starts. The order is fixed for
    /// the rest of the session.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Seed for reproducible shuffles.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub fn list_lessons(&self) -> Vec<LessonListing> {
        self.bank.lessons()
    }

    /// Start a new session for the given lesson.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Bank` if the lesson cannot be loaded.
    pub fn start_lesson(&self, lesson_id: &LessonId) -> Result<LessonSession, RunnerError> {
        let mut lesson = self.bank.lesson(lesson_id)?;

        if self.shuffle {
            let mut order: Vec<usize> = (0..lesson.len()).collect();
            match self.seed {
                Some(seed) => order.shuffle(&mut StdRng::seed_from_u64(seed)),
                None => order.shuffle(&mut rng()),
            }
            lesson = lesson.reordered(&order);
        }

        let session = LessonSession::start(lesson, self.settings, self.clock);
        info!(
            lesson = %lesson_id,
            session = %session.id(),
            questions = session.total_questions(),
            hearts = session.hearts(),
            "lesson started"
        );
        Ok(session)
    }

    /// Apply one learner intent and return the state to render.
    ///
    /// # Errors
    ///
    /// Returns the `IntentError` when the intent is not valid right now. The
    /// session is unchanged in that case.
    pub fn dispatch(
        &self,
        session: &mut LessonSession,
        intent: Intent,
        sink: &mut dyn NotificationSink,
    ) -> Result<SessionSnapshot, IntentError> {
        let question = session.current_question().id().clone();
        match session.apply(intent, sink) {
            Ok(outcome) => {
                log_outcome(session, &outcome);
                Ok(session.snapshot())
            }
            Err(err) => {
                debug!(session = %session.id(), question = %question, ?intent, %err, "intent rejected");
                Err(err)
            }
        }
    }

    /// Summary of a finished session.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::NotComplete` while questions remain.
    pub fn summary(&self, session: &LessonSession) -> Result<LessonSummary, RunnerError> {
        let summary = session.summary().ok_or(RunnerError::NotComplete)??;
        Ok(summary)
    }
}

fn log_outcome(session: &LessonSession, outcome: &IntentOutcome) {
    let id = session.id();
    match outcome {
        IntentOutcome::Selected { option } => {
            debug!(session = %id, %option, "answer selected");
        }
        IntentOutcome::Answered(answer) => {
            debug!(
                session = %id,
                correct = answer.is_correct,
                score = session.score(),
                hearts = session.hearts(),
                "answer submitted"
            );
        }
        IntentOutcome::Hint(hint) => {
            debug!(session = %id, charged = hint.hearts_charged, hearts = session.hearts(), "hint shown");
        }
        IntentOutcome::Advanced(Advance::NextQuestion { index }) => {
            debug!(session = %id, index, "next question");
        }
        IntentOutcome::Advanced(Advance::Complete { final_score }) => {
            info!(session = %id, final_score, hearts = session.hearts(), "lesson complete");
        }
    }
}

impl fmt::Debug for LessonRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonRunner")
            .field("clock", &self.clock)
            .field("settings", &self.settings)
            .field("shuffle", &self.shuffle)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

//
// ─── LOGGING SINK ──────────────────────────────────────────────────────────────
//

/// Sink that records every notification with `tracing` and forwards it.
#[derive(Debug, Default)]
pub struct LoggingSink<S = NullSink> {
    inner: S,
}

impl<S: NotificationSink> LoggingSink<S> {
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: NotificationSink> NotificationSink for LoggingSink<S> {
    fn notify(&mut self, notification: Notification) {
        let tone = match notification.tone() {
            Tone::Success => "success",
            Tone::Error => "error",
        };
        info!(tone, message = %notification.message(), "notification");
        self.inner.notify(notification);
    }
}
