use serde::Serialize;

/// Transient message emitted by a lesson session.
///
/// Notifications are fire-and-forget; nothing a sink does can change
/// session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    AnswerCorrect { xp: u32 },
    AnswerIncorrect,
    LessonComplete { final_score: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Error,
}

impl Notification {
    #[must_use]
    pub fn tone(&self) -> Tone {
        match self {
            Notification::AnswerCorrect { .. } | Notification::LessonComplete { .. } => {
                Tone::Success
            }
            Notification::AnswerIncorrect => Tone::Error,
        }
    }

    /// Toast text shown to the learner.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Notification::AnswerCorrect { xp } => format!("Correct! +{xp} XP"),
            Notification::AnswerIncorrect => "Not quite right. Try again!".to_string(),
            Notification::LessonComplete { final_score } => {
                format!("Lesson complete! Final score: {final_score} XP")
            }
        }
    }
}

/// Receiver for session notifications.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Collects notifications in order; handy for tests and batch rendering.
impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for &mut S {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _notification: Notification) {}
}
