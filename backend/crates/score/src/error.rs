//! Score Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type ScoreResult<T> = Result<T, ScoreError>;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Exam not found")]
    ExamNotFound,

    #[error("Score not found")]
    ScoreNotFound,

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScoreError::ExamNotFound | ScoreError::ScoreNotFound => ErrorKind::NotFound,
            ScoreError::App(e) => e.kind(),
            ScoreError::Database(_) | ScoreError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            ScoreError::App(e) => AppError::new(e.kind(), e.message().to_string()),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            ScoreError::Database(e) => {
                tracing::error!(error = %e, "Score database error");
            }
            ScoreError::Internal(msg) => {
                tracing::error!(message = %msg, "Score internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Score error");
            }
        }
    }
}

impl IntoResponse for ScoreError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
