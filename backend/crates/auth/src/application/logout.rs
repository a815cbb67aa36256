//! Logout Use Case

use kernel::principal::Principal;
use std::sync::Arc;

use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

pub struct LogoutUseCase<R>
where
    R: SessionRepository,
{
    repo: Arc<R>,
}

impl<R> LogoutUseCase<R>
where
    R: SessionRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Revoke the session behind the current token
    pub async fn execute(&self, principal: &Principal) -> AuthResult<()> {
        self.repo.delete_session(&principal.session_id).await?;

        tracing::info!(
            user_id = %principal.user_id,
            session_id = %principal.session_id,
            "User logged out"
        );

        Ok(())
    }
}
