//! Certificate Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::CertificateStatus;

pub type CertificateResult<T> = Result<T, CertificateError>;

#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("Certificate not found")]
    CertificateNotFound,

    #[error("Exam not found")]
    ExamNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Template not found")]
    TemplateNotFound,

    #[error("Renewal application not found")]
    RenewalNotFound,

    #[error("Certificate number already exists")]
    NumberTaken,

    #[error("A {0} certificate cannot be revoked")]
    NotRevocable(CertificateStatus),

    #[error("A {0} certificate cannot be renewed or replaced")]
    NotSupersedable(CertificateStatus),

    #[error("A renewal application for this certificate is already pending")]
    RenewalPending,

    #[error("Renewal application has already been processed")]
    RenewalNotPending,

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CertificateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CertificateError::CertificateNotFound
            | CertificateError::ExamNotFound
            | CertificateError::UserNotFound
            | CertificateError::TemplateNotFound
            | CertificateError::RenewalNotFound => ErrorKind::NotFound,
            CertificateError::NumberTaken
            | CertificateError::NotRevocable(_)
            | CertificateError::NotSupersedable(_)
            | CertificateError::RenewalPending
            | CertificateError::RenewalNotPending => ErrorKind::Conflict,
            CertificateError::App(e) => e.kind(),
            CertificateError::Database(_) | CertificateError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            CertificateError::App(e) => AppError::new(e.kind(), e.message().to_string()),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            CertificateError::Database(e) => {
                tracing::error!(error = %e, "Certificate database error");
            }
            CertificateError::Internal(msg) => {
                tracing::error!(message = %msg, "Certificate internal error");
            }
            CertificateError::App(e) if e.kind() == ErrorKind::Forbidden => {
                tracing::warn!(error = %e, "Certificate access denied");
            }
            _ => {
                tracing::debug!(error = %self, "Certificate error");
            }
        }
    }

    /// Map constraint violations the schema uses as guards
    pub(crate) fn from_constraint(err: sqlx::Error) -> Self {
        let mapped = match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => match db.constraint() {
                Some("certificates_certificate_number_key") => Some(CertificateError::NumberTaken),
                Some("certificate_renewal_pending_uidx") => Some(CertificateError::RenewalPending),
                Some("certificates_successor_uidx") => Some(CertificateError::NotSupersedable(
                    CertificateStatus::Replaced,
                )),
                Some("certificate_templates_default_uidx") => Some(CertificateError::App(
                    AppError::conflict("Another default template was set at the same time"),
                )),
                _ => None,
            },
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                match db.constraint() {
                    Some("certificates_user_id_fkey") => Some(CertificateError::UserNotFound),
                    Some("certificates_exam_id_fkey") => Some(CertificateError::ExamNotFound),
                    Some("certificates_template_id_fkey") => {
                        Some(CertificateError::TemplateNotFound)
                    }
                    _ => None,
                }
            }
            _ => None,
        };
        mapped.unwrap_or(CertificateError::Database(err))
    }
}

impl IntoResponse for CertificateError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
