//! Bootstrap Admin Use Case
//!
//! Ensures at least one admin exists when the binary is configured with
//! bootstrap credentials. Does nothing once any admin exists.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{Credential, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, RawPassword, UserPassword, Username};
use crate::error::AuthResult;

pub struct BootstrapAdminInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    AlreadyPresent,
    Promoted,
    Created,
}

pub struct BootstrapAdminUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> BootstrapAdminUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: BootstrapAdminInput) -> AuthResult<BootstrapOutcome> {
        if self.repo.admin_exists().await? {
            return Ok(BootstrapOutcome::AlreadyPresent);
        }

        let username = Username::new(&input.username)?;

        if let Some(mut user) = self.repo.find_by_username(&username).await? {
            user.promote_to_admin();
            self.repo.update_user(&user).await?;
            tracing::info!(user_id = %user.user_id, "Promoted existing user to admin");
            return Ok(BootstrapOutcome::Promoted);
        }

        let email = Email::new(&input.email)?;
        let raw_password = RawPassword::new(input.password)?;
        let password = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let user = User::administrator(username, email);
        let credential = Credential::new(user.user_id, password);
        self.repo.register(&user, &credential).await?;

        tracing::info!(user_id = %user.user_id, "Created bootstrap admin");
        Ok(BootstrapOutcome::Created)
    }
}
