#![forbid(unsafe_code)]

pub mod bank;
pub mod error;
pub mod runner;

pub use lesson_core::Clock;

pub use bank::{InMemoryQuestionBank, JsonQuestionBank, LessonListing, QuestionBank};
pub use error::{BankError, RunnerError};
pub use runner::{LessonRunner, LoggingSink};
