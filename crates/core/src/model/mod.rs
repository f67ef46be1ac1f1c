mod ids;
mod lesson;
mod question;
mod settings;
mod summary;

pub use ids::{LessonId, ParseIdError, QuestionId, SessionId};

pub use lesson::{Lesson, LessonDraft, LessonError};
pub use question::{OptionIndex, Question, QuestionDraft, QuestionError, QuestionKind};
pub use settings::{SessionSettings, SettingsError};
pub use summary::{AnswerTally, LessonSummary, LessonSummaryError};
