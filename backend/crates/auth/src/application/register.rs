//! Register Use Case
//!
//! Creates a student account with its password credential.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{Credential, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, Phone, RawPassword, UserPassword, Username};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<User> {
        let username = Username::new(&input.username)?;
        let email = Email::new(&input.email)?;
        let phone = Phone::parse_optional(input.phone.as_deref())?;
        let raw_password = RawPassword::new(input.password)?;

        if self.repo.exists_by_username(&username).await? {
            return Err(AuthError::UsernameTaken);
        }
        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password = UserPassword::from_raw(&raw_password, self.config.pepper())?;
        let user = User::new(username, email, phone);
        let credential = Credential::new(user.user_id, password);

        self.repo.register(&user, &credential).await?;

        tracing::info!(
            user_id = %user.user_id,
            username = %user.username,
            "User registered"
        );

        Ok(user)
    }
}
