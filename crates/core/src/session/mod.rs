mod intent;
mod snapshot;
mod state;

pub use intent::{Advance, AnswerOutcome, HintOutcome, Intent, IntentError, IntentOutcome};
pub use snapshot::{OptionState, OptionView, SessionSnapshot};
pub use state::{LessonSession, QuestionPhase, SessionStatus};
