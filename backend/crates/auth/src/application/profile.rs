//! Profile Use Cases
//!
//! Read and update the caller's own account.

use kernel::principal::Principal;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::User;
use crate::domain::repository::{CredentialRepository, UserRepository};
use crate::domain::value_object::{Email, Phone, RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct GetProfileUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> GetProfileUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, principal: &Principal) -> AuthResult<User> {
        self.repo
            .find_by_id(&principal.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Profile update input. Absent fields stay unchanged; a blank phone clears it.
#[derive(Default)]
pub struct UpdateProfileInput {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub struct UpdateProfileUseCase<R>
where
    R: UserRepository + CredentialRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> UpdateProfileUseCase<R>
where
    R: UserRepository + CredentialRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        principal: &Principal,
        input: UpdateProfileInput,
    ) -> AuthResult<User> {
        let mut user = self
            .repo
            .find_by_id(&principal.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if let Some(email) = input.email {
            let email = Email::new(&email)?;
            if email != user.email {
                if self.repo.exists_by_email(&email).await? {
                    return Err(AuthError::EmailTaken);
                }
                user.change_email(email);
            }
        }

        if let Some(phone) = input.phone {
            user.change_phone(Phone::parse_optional(Some(&phone))?);
        }

        let credential = match input.new_password {
            Some(new_password) => {
                let current = input
                    .current_password
                    .ok_or(AuthError::CurrentPasswordRequired)?;
                let new_password = RawPassword::new(new_password)?;

                let mut credential = self
                    .repo
                    .find_credential(&user.user_id)
                    .await?
                    .ok_or_else(|| AuthError::Internal("Credential not found".to_string()))?;

                if !credential
                    .password
                    .verify(&RawPassword::for_login(current), self.config.pepper())
                {
                    return Err(AuthError::InvalidCredentials);
                }

                credential.change_password(UserPassword::from_raw(
                    &new_password,
                    self.config.pepper(),
                )?);
                Some(credential)
            }
            None => None,
        };

        self.repo
            .save_profile(&user, credential.as_ref(), principal.session_id)
            .await?;

        tracing::info!(
            user_id = %user.user_id,
            password_changed = credential.is_some(),
            "Profile updated"
        );

        Ok(user)
    }
}
