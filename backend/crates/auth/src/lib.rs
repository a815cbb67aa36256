//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, access guard
//!
//! ## Features
//! - Registration and login with username (or email) + password
//! - Server-side sessions behind HMAC-signed bearer tokens
//! - Student/admin roles, checked centrally per route group
//! - Profile updates; a password change revokes the other sessions
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Tokens are useless without their session row; logout deletes it
//! - Temporary lockout after repeated failed logins

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::guard::{AuthGuard, require_access};
pub use presentation::handlers::AuthAppState;
pub use presentation::router::auth_routes;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::infra::postgres::PgAuthRepository as AuthStore;
}
