//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::{SessionId, UserId};
use kernel::principal::Principal;

use crate::domain::entity::{Credential, Session, User};
use crate::domain::value_object::{Email, Username};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user together with its credential (one transaction)
    async fn register(&self, user: &User, credential: &Credential) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Case-insensitive lookup via the canonical form
    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_username(&self, username: &Username) -> AuthResult<bool>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Update profile fields and role
    async fn update_user(&self, user: &User) -> AuthResult<()>;

    async fn admin_exists(&self) -> AuthResult<bool>;

    /// Persist a successful login: user, reset credential and new session
    async fn record_login(
        &self,
        user: &User,
        credential: &Credential,
        session: &Session,
    ) -> AuthResult<()>;

    /// Persist a profile change. When `credential` is given the password
    /// changed and every session except `keep_session` is revoked.
    async fn save_profile(
        &self,
        user: &User,
        credential: Option<&Credential>,
        keep_session: SessionId,
    ) -> AuthResult<()>;
}

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    async fn find_credential(&self, user_id: &UserId) -> AuthResult<Option<Credential>>;

    /// Update hash and failure counters
    async fn update_credential(&self, credential: &Credential) -> AuthResult<()>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create_session(&self, session: &Session) -> AuthResult<()>;

    /// Resolve an unexpired session into the caller, reading the current role
    async fn find_principal(
        &self,
        session_id: &SessionId,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Principal>>;

    async fn delete_session(&self, session_id: &SessionId) -> AuthResult<()>;

    /// Delete expired sessions
    async fn cleanup_expired_sessions(&self) -> AuthResult<u64>;
}
