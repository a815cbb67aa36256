//! Exam Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type ExamResult<T> = Result<T, ExamError>;

#[derive(Debug, Error)]
pub enum ExamError {
    #[error("Exam not found")]
    ExamNotFound,

    #[error("Application not found")]
    ApplicationNotFound,

    #[error("Exam code is already in use")]
    ExamCodeTaken,

    #[error("Exam code cannot be changed")]
    ExamCodeImmutable,

    #[error("Exam is not open for registration")]
    ExamNotPublished,

    #[error("Registration has not started yet")]
    RegistrationNotStarted,

    #[error("Registration has ended")]
    RegistrationEnded,

    #[error("Exam has reached its applicant limit")]
    ExamFull,

    #[error("You have already applied for this exam")]
    AlreadyApplied,

    /// Review, edit or withdrawal of an application that left `pending`
    #[error("Application has already been processed")]
    ApplicationNotPending,

    #[error("Exam has issued certificates and cannot be deleted")]
    ExamHasCertificates,

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExamError::ExamNotFound | ExamError::ApplicationNotFound => ErrorKind::NotFound,
            ExamError::ExamCodeImmutable
            | ExamError::ExamNotPublished
            | ExamError::RegistrationNotStarted
            | ExamError::RegistrationEnded => ErrorKind::BadRequest,
            ExamError::ExamCodeTaken
            | ExamError::ExamFull
            | ExamError::AlreadyApplied
            | ExamError::ApplicationNotPending
            | ExamError::ExamHasCertificates => ErrorKind::Conflict,
            ExamError::App(e) => e.kind(),
            ExamError::Database(_) | ExamError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            ExamError::App(e) => AppError::new(e.kind(), e.message().to_string()),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            ExamError::Database(e) => {
                tracing::error!(error = %e, "Exam database error");
            }
            ExamError::Internal(msg) => {
                tracing::error!(message = %msg, "Exam internal error");
            }
            ExamError::App(e) if e.kind() == ErrorKind::Forbidden => {
                tracing::warn!(error = %e, "Exam access denied");
            }
            _ => {
                tracing::debug!(error = %self, "Exam error");
            }
        }
    }

    /// Map constraint violations the schema uses as guards
    pub(crate) fn from_constraint(err: sqlx::Error) -> Self {
        let mapped = match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => match db.constraint() {
                Some("exams_exam_code_key") => Some(ExamError::ExamCodeTaken),
                Some("exam_applications_active_uidx") => Some(ExamError::AlreadyApplied),
                _ => None,
            },
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                match db.constraint() {
                    Some("certificates_exam_id_fkey") => Some(ExamError::ExamHasCertificates),
                    _ => None,
                }
            }
            _ => None,
        };
        mapped.unwrap_or_else(|| ExamError::Database(err))
    }
}

impl IntoResponse for ExamError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
