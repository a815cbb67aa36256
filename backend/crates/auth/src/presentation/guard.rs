//! Access Guard
//!
//! Middleware that turns a bearer token into a [`Principal`] and checks the
//! role against the route group's [`Access`] level. Applied once per group
//! by the API binary.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use kernel::principal::{Access, Principal};
use platform::client::extract_bearer_token;
use std::sync::Arc;

use crate::application::AuthenticateUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::SessionRepository;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthGuard<R>
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub access: Access,
}

/// 401 without a valid session, 403 when the role is not permitted
pub async fn require_access<R>(
    State(guard): State<AuthGuard<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    R: SessionRepository + Clone + Send + Sync + 'static,
{
    let token = extract_bearer_token(req.headers()).map(str::to_owned);

    let principal: Principal = AuthenticateUseCase::new(guard.repo.clone(), guard.config.clone())
        .execute(token.as_deref())
        .await?;

    if !guard.access.permits(principal.role) {
        tracing::warn!(
            user_id = %principal.user_id,
            role = %principal.role,
            required = ?guard.access,
            "Access denied"
        );
        return Err(AuthError::Forbidden);
    }

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}
