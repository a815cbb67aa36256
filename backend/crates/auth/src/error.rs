//! Auth Error Types
//!
//! Auth-specific error variants rendered through `kernel::error::AppError`.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Email is already registered")]
    EmailTaken,

    /// Wrong username or password. Deliberately vague.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Account is temporarily locked after repeated failed logins")]
    AccountLocked,

    #[error("Missing bearer token")]
    TokenMissing,

    /// Token malformed, badly signed, expired or revoked
    #[error("Session is invalid or has expired")]
    SessionInvalid,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Current password is required to set a new password")]
    CurrentPasswordRequired,

    #[error("{0}")]
    PasswordPolicy(String),

    /// Validation failures raised by value objects
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::UsernameTaken | AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials | AuthError::TokenMissing | AuthError::SessionInvalid => {
                ErrorKind::Unauthorized
            }
            AuthError::AccountLocked | AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::CurrentPasswordRequired | AuthError::PasswordPolicy(_) => {
                ErrorKind::BadRequest
            }
            AuthError::App(e) => e.kind(),
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::TokenMissing | AuthError::SessionInvalid => {
                err.with_action("Log in and send the token as `Authorization: Bearer <token>`")
            }
            AuthError::AccountLocked => err.with_action("Try again in a few minutes"),
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountLocked => {
                tracing::warn!("Login attempt on locked account");
            }
            AuthError::Forbidden => {
                tracing::warn!("Access denied for role");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }

    /// Map a unique violation on `users` to the matching conflict
    pub(crate) fn from_unique_violation(err: sqlx::Error) -> Self {
        let conflict = match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => match db.constraint() {
                Some("users_username_canonical_key") => Some(AuthError::UsernameTaken),
                Some("users_email_key") => Some(AuthError::EmailTaken),
                _ => None,
            },
            _ => None,
        };
        conflict.unwrap_or_else(|| AuthError::Database(err))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
