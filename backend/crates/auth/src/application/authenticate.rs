//! Authenticate Use Case
//!
//! Resolves a bearer token into the calling [`Principal`].

use chrono::Utc;
use kernel::principal::Principal;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::verify_token;
use crate::domain::repository::SessionRepository;
use crate::error::{AuthError, AuthResult};

pub struct AuthenticateUseCase<R>
where
    R: SessionRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> AuthenticateUseCase<R>
where
    R: SessionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, token: Option<&str>) -> AuthResult<Principal> {
        let token = token.ok_or(AuthError::TokenMissing)?;
        let session_id =
            verify_token(&self.config.token_secret, token).ok_or(AuthError::SessionInvalid)?;

        self.repo
            .find_principal(&session_id, Utc::now())
            .await?
            .ok_or(AuthError::SessionInvalid)
    }
}
