//! Login Use Case
//!
//! Verifies a password and opens a session.

use chrono::{DateTime, Utc};
use platform::client::ClientInfo;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::issue_token;
use crate::domain::entity::{Session, User};
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::{Email, RawPassword, Username};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    /// Username or email
    pub identifier: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: UserRepository + CredentialRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository + CredentialRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: LoginInput, client: ClientInfo) -> AuthResult<LoginOutput> {
        let user = if input.identifier.contains('@') {
            let email = Email::new(&input.identifier).map_err(|_| AuthError::InvalidCredentials)?;
            self.repo.find_by_email(&email).await?
        } else {
            let username =
                Username::new(&input.identifier).map_err(|_| AuthError::InvalidCredentials)?;
            self.repo.find_by_username(&username).await?
        };
        let mut user = user.ok_or(AuthError::InvalidCredentials)?;

        let mut credential = self
            .repo
            .find_credential(&user.user_id)
            .await?
            .ok_or_else(|| AuthError::Internal("Credential not found".to_string()))?;

        if credential.is_locked() {
            return Err(AuthError::AccountLocked);
        }

        let raw_password = RawPassword::for_login(input.password);
        if !credential.password.verify(&raw_password, self.config.pepper()) {
            credential.record_failure(self.config.max_login_failures, self.config.lockout());
            self.repo.update_credential(&credential).await?;
            return Err(AuthError::InvalidCredentials);
        }

        credential.reset_failures();
        user.record_login();
        let session = Session::new(user.user_id, &client, self.config.token_ttl());

        self.repo.record_login(&user, &credential, &session).await?;

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            "User logged in"
        );

        Ok(LoginOutput {
            access_token: issue_token(&self.config.token_secret, &session.session_id),
            expires_at: session.expires_at,
            user,
        })
    }
}
