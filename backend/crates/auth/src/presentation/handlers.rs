//! HTTP Handlers

use kernel::extract::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::principal::{Access, Principal};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    GetProfileUseCase, LoginInput, LoginUseCase, LogoutUseCase, RegisterInput, RegisterUseCase,
    UpdateProfileInput, UpdateProfileUseCase,
};
use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    LoginRequest, LoginResponse, RegisterRequest, UpdateProfileRequest, UserResponse,
};
use crate::presentation::extract::Client;
use crate::presentation::guard::AuthGuard;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
        }
    }

    /// Guard state for a route group sharing this repository and config
    pub fn guard(&self, access: Access) -> AuthGuard<R> {
        AuthGuard {
            repo: self.repo.clone(),
            config: self.config.clone(),
            access,
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let user = use_case
        .execute(RegisterInput {
            username: req.username,
            email: req.email,
            password: req.password,
            phone: req.phone,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

// ============================================================================
// Login / Logout
// ============================================================================

/// POST /api/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Client(client): Client,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(
            LoginInput {
                identifier: req.username,
                password: req.password,
            },
            client,
        )
        .await?;

    Ok(Json(LoginResponse {
        access_token: output.access_token,
        token_type: "Bearer",
        expires_at: output.expires_at,
        user: UserResponse::from(&output.user),
    }))
}

/// POST /api/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    principal: Principal,
) -> AuthResult<StatusCode>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    LogoutUseCase::new(state.repo.clone()).execute(&principal).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/profile
pub async fn get_profile<R>(
    State(state): State<AuthAppState<R>>,
    principal: Principal,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let user = GetProfileUseCase::new(state.repo.clone())
        .execute(&principal)
        .await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/profile
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    principal: Principal,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone(), state.config.clone());

    let user = use_case
        .execute(
            &principal,
            UpdateProfileInput {
                email: req.email,
                phone: req.phone,
                current_password: req.current_password,
                new_password: req.new_password,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(&user)))
}
