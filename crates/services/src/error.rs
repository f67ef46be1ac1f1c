//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use lesson_core::model::{LessonError, LessonId, LessonSummaryError};

/// Errors emitted by question banks.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("lesson not found: {0}")]
    NotFound(LessonId),
    #[error("duplicate lesson id: {0}")]
    Duplicate(LessonId),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid lesson in {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: LessonError,
    },
}

/// Errors emitted by `LessonRunner`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunnerError {
    #[error("lesson is not complete yet")]
    NotComplete,
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Summary(#[from] LessonSummaryError),
}
