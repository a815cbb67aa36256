//! Unit tests for Auth crate
//!
//! Use cases run against an in-memory repository implementing the same
//! traits as `PgAuthRepository`.

#[cfg(test)]
pub(crate) mod fake {
    use chrono::{DateTime, Utc};
    use kernel::id::{SessionId, UserId};
    use kernel::principal::Principal;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use crate::domain::entity::{Credential, Session, User};
    use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
    use crate::domain::value_object::{Email, Username};
    use crate::error::{AuthError, AuthResult};

    #[derive(Default)]
    pub struct MemState {
        pub users: HashMap<UserId, User>,
        pub credentials: HashMap<UserId, Credential>,
        pub sessions: HashMap<SessionId, Session>,
    }

    #[derive(Clone, Default)]
    pub struct InMemoryAuth {
        pub state: Arc<Mutex<MemState>>,
    }

    impl InMemoryAuth {
        pub fn session_count(&self, user_id: &UserId) -> usize {
            let state = self.state.lock().unwrap();
            state
                .sessions
                .values()
                .filter(|s| &s.user_id == user_id)
                .count()
        }
    }

    impl UserRepository for InMemoryAuth {
        async fn register(&self, user: &User, credential: &Credential) -> AuthResult<()> {
            let mut state = self.state.lock().unwrap();
            if state
                .users
                .values()
                .any(|u| u.username.canonical() == user.username.canonical())
            {
                return Err(AuthError::UsernameTaken);
            }
            if state.users.values().any(|u| u.email == user.email) {
                return Err(AuthError::EmailTaken);
            }
            state.users.insert(user.user_id, user.clone());
            state.credentials.insert(user.user_id, credential.clone());
            Ok(())
        }

        async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
            Ok(self.state.lock().unwrap().users.get(user_id).cloned())
        }

        async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .users
                .values()
                .find(|u| u.username.canonical() == username.canonical())
                .cloned())
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
            let state = self.state.lock().unwrap();
            Ok(state.users.values().find(|u| &u.email == email).cloned())
        }

        async fn exists_by_username(&self, username: &Username) -> AuthResult<bool> {
            Ok(self.find_by_username(username).await?.is_some())
        }

        async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
            Ok(self.find_by_email(email).await?.is_some())
        }

        async fn update_user(&self, user: &User) -> AuthResult<()> {
            self.state
                .lock()
                .unwrap()
                .users
                .insert(user.user_id, user.clone());
            Ok(())
        }

        async fn admin_exists(&self) -> AuthResult<bool> {
            let state = self.state.lock().unwrap();
            Ok(state.users.values().any(|u| u.role.is_admin()))
        }

        async fn record_login(
            &self,
            user: &User,
            credential: &Credential,
            session: &Session,
        ) -> AuthResult<()> {
            let mut state = self.state.lock().unwrap();
            state.users.insert(user.user_id, user.clone());
            state.credentials.insert(user.user_id, credential.clone());
            state.sessions.insert(session.session_id, session.clone());
            Ok(())
        }

        async fn save_profile(
            &self,
            user: &User,
            credential: Option<&Credential>,
            keep_session: SessionId,
        ) -> AuthResult<()> {
            let mut state = self.state.lock().unwrap();
            state.users.insert(user.user_id, user.clone());
            if let Some(credential) = credential {
                state.credentials.insert(user.user_id, credential.clone());
                state
                    .sessions
                    .retain(|id, s| s.user_id != user.user_id || *id == keep_session);
            }
            Ok(())
        }
    }

    impl CredentialRepository for InMemoryAuth {
        async fn find_credential(&self, user_id: &UserId) -> AuthResult<Option<Credential>> {
            Ok(self.state.lock().unwrap().credentials.get(user_id).cloned())
        }

        async fn update_credential(&self, credential: &Credential) -> AuthResult<()> {
            self.state
                .lock()
                .unwrap()
                .credentials
                .insert(credential.user_id, credential.clone());
            Ok(())
        }
    }

    impl SessionRepository for InMemoryAuth {
        async fn create_session(&self, session: &Session) -> AuthResult<()> {
            self.state
                .lock()
                .unwrap()
                .sessions
                .insert(session.session_id, session.clone());
            Ok(())
        }

        async fn find_principal(
            &self,
            session_id: &SessionId,
            now: DateTime<Utc>,
        ) -> AuthResult<Option<Principal>> {
            let state = self.state.lock().unwrap();
            let Some(session) = state.sessions.get(session_id) else {
                return Ok(None);
            };
            if session.expires_at <= now {
                return Ok(None);
            }
            Ok(state
                .users
                .get(&session.user_id)
                .map(|u| Principal::new(u.user_id, session.session_id, u.role)))
        }

        async fn delete_session(&self, session_id: &SessionId) -> AuthResult<()> {
            self.state.lock().unwrap().sessions.remove(session_id);
            Ok(())
        }

        async fn cleanup_expired_sessions(&self) -> AuthResult<u64> {
            let mut state = self.state.lock().unwrap();
            let before = state.sessions.len();
            let now = Utc::now();
            state.sessions.retain(|_, s| s.expires_at > now);
            Ok((before - state.sessions.len()) as u64)
        }
    }
}

#[cfg(test)]
mod use_case_tests {
    use kernel::principal::Principal;
    use kernel::role::UserRole;
    use platform::client::ClientInfo;
    use std::sync::Arc;

    use super::fake::InMemoryAuth;
    use crate::application::*;
    use crate::domain::repository::{SessionRepository, UserRepository};
    use crate::domain::value_object::Username;
    use crate::error::AuthError;

    const PASSWORD: &str = "Renewal-Ready-42";

    fn setup() -> (Arc<InMemoryAuth>, Arc<AuthConfig>) {
        (
            Arc::new(InMemoryAuth::default()),
            Arc::new(AuthConfig::development()),
        )
    }

    fn register_input(username: &str) -> RegisterInput {
        RegisterInput {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: PASSWORD.to_string(),
            phone: None,
        }
    }

    async fn login(
        repo: &Arc<InMemoryAuth>,
        config: &Arc<AuthConfig>,
        identifier: &str,
        password: &str,
    ) -> Result<LoginOutput, AuthError> {
        LoginUseCase::new(repo.clone(), config.clone())
            .execute(
                LoginInput {
                    identifier: identifier.to_string(),
                    password: password.to_string(),
                },
                ClientInfo::default(),
            )
            .await
    }

    async fn principal_for(
        repo: &Arc<InMemoryAuth>,
        config: &Arc<AuthConfig>,
        token: &str,
    ) -> Result<Principal, AuthError> {
        AuthenticateUseCase::new(repo.clone(), config.clone())
            .execute(Some(token))
            .await
    }

    #[tokio::test]
    async fn test_register_creates_student() {
        let (repo, config) = setup();
        let user = RegisterUseCase::new(repo.clone(), config)
            .execute(register_input("candidate01"))
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.email.as_str(), "candidate01@example.com");
        assert!(repo.find_by_id(&user.user_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_register_duplicate_username_is_case_insensitive() {
        let (repo, config) = setup();
        let use_case = RegisterUseCase::new(repo, config);
        use_case.execute(register_input("candidate01")).await.unwrap();

        let mut input = register_input("Candidate01");
        input.email = "other@example.com".to_string();
        let err = use_case.execute(input).await.unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));
        assert_eq!(err.kind().status_code(), 409);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (repo, config) = setup();
        let use_case = RegisterUseCase::new(repo, config);
        use_case.execute(register_input("candidate01")).await.unwrap();

        let mut input = register_input("candidate02");
        input.email = "CANDIDATE01@example.com".to_string();
        let err = use_case.execute(input).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let (repo, config) = setup();
        let mut input = register_input("candidate01");
        input.password = "12345678".to_string();

        let err = RegisterUseCase::new(repo, config)
            .execute(input)
            .await
            .unwrap_err();
        assert_eq!(err.kind().status_code(), 400);
    }

    #[tokio::test]
    async fn test_login_issues_working_token() {
        let (repo, config) = setup();
        let user = RegisterUseCase::new(repo.clone(), config.clone())
            .execute(register_input("candidate01"))
            .await
            .unwrap();

        let output = login(&repo, &config, "candidate01", PASSWORD).await.unwrap();
        assert!(output.user.last_login_at.is_some());

        let principal = principal_for(&repo, &config, &output.access_token)
            .await
            .unwrap();
        assert_eq!(principal.user_id, user.user_id);
        assert_eq!(principal.role, UserRole::Student);
    }

    #[tokio::test]
    async fn test_login_by_email() {
        let (repo, config) = setup();
        RegisterUseCase::new(repo.clone(), config.clone())
            .execute(register_input("candidate01"))
            .await
            .unwrap();

        assert!(
            login(&repo, &config, "Candidate01@Example.com", PASSWORD)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_invalid_credentials() {
        let (repo, config) = setup();
        let err = login(&repo, &config, "nobody", PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.kind().status_code(), 401);
    }

    #[tokio::test]
    async fn test_repeated_failures_lock_account() {
        let (repo, config) = setup();
        RegisterUseCase::new(repo.clone(), config.clone())
            .execute(register_input("candidate01"))
            .await
            .unwrap();

        for _ in 0..config.max_login_failures {
            let err = login(&repo, &config, "candidate01", "Wrong-Guess-99")
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
        }

        // Even the right password is refused while locked
        let err = login(&repo, &config, "candidate01", PASSWORD)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountLocked));
        assert_eq!(err.kind().status_code(), 403);
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let (repo, config) = setup();
        RegisterUseCase::new(repo.clone(), config.clone())
            .execute(register_input("candidate01"))
            .await
            .unwrap();
        let output = login(&repo, &config, "candidate01", PASSWORD).await.unwrap();
        let principal = principal_for(&repo, &config, &output.access_token)
            .await
            .unwrap();

        LogoutUseCase::new(repo.clone())
            .execute(&principal)
            .await
            .unwrap();

        let err = principal_for(&repo, &config, &output.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SessionInvalid));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_missing_and_forged_tokens() {
        let (repo, config) = setup();
        let use_case = AuthenticateUseCase::new(repo, config);

        assert!(matches!(
            use_case.execute(None).await.unwrap_err(),
            AuthError::TokenMissing
        ));
        assert!(matches!(
            use_case.execute(Some("garbage")).await.unwrap_err(),
            AuthError::SessionInvalid
        ));
    }

    #[tokio::test]
    async fn test_expired_sessions_are_swept() {
        let (repo, _) = setup();
        let config = Arc::new(AuthConfig {
            access_token_ttl: std::time::Duration::ZERO,
            ..AuthConfig::development()
        });
        RegisterUseCase::new(repo.clone(), config.clone())
            .execute(register_input("candidate01"))
            .await
            .unwrap();
        let output = login(&repo, &config, "candidate01", PASSWORD).await.unwrap();

        assert!(
            principal_for(&repo, &config, &output.access_token)
                .await
                .is_err()
        );
        assert_eq!(repo.cleanup_expired_sessions().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_password_change_requires_current_and_revokes_other_sessions() {
        let (repo, config) = setup();
        let user = RegisterUseCase::new(repo.clone(), config.clone())
            .execute(register_input("candidate01"))
            .await
            .unwrap();
        let first = login(&repo, &config, "candidate01", PASSWORD).await.unwrap();
        let _second = login(&repo, &config, "candidate01", PASSWORD).await.unwrap();
        assert_eq!(repo.session_count(&user.user_id), 2);

        let principal = principal_for(&repo, &config, &first.access_token)
            .await
            .unwrap();
        let use_case = UpdateProfileUseCase::new(repo.clone(), config.clone());

        let err = use_case
            .execute(
                &principal,
                UpdateProfileInput {
                    new_password: Some("Fresh-Password-77".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::CurrentPasswordRequired));

        use_case
            .execute(
                &principal,
                UpdateProfileInput {
                    current_password: Some(PASSWORD.to_string()),
                    new_password: Some("Fresh-Password-77".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(repo.session_count(&user.user_id), 1);
        assert!(
            login(&repo, &config, "candidate01", "Fresh-Password-77")
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_update_profile_email_conflict_and_phone_clear() {
        let (repo, config) = setup();
        let register = RegisterUseCase::new(repo.clone(), config.clone());
        register.execute(register_input("candidate01")).await.unwrap();
        let mut input = register_input("candidate02");
        input.phone = Some("+1 555 0100".to_string());
        register.execute(input).await.unwrap();

        let output = login(&repo, &config, "candidate02", PASSWORD).await.unwrap();
        let principal = principal_for(&repo, &config, &output.access_token)
            .await
            .unwrap();
        let use_case = UpdateProfileUseCase::new(repo.clone(), config.clone());

        let err = use_case
            .execute(
                &principal,
                UpdateProfileInput {
                    email: Some("candidate01@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));

        let user = use_case
            .execute(
                &principal,
                UpdateProfileInput {
                    phone: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(user.phone.is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_admin() {
        let (repo, config) = setup();
        let use_case = BootstrapAdminUseCase::new(repo.clone(), config.clone());
        let input = || BootstrapAdminInput {
            username: "registrar".to_string(),
            email: "registrar@example.com".to_string(),
            password: PASSWORD.to_string(),
        };

        assert_eq!(use_case.execute(input()).await.unwrap(), BootstrapOutcome::Created);
        assert_eq!(
            use_case.execute(input()).await.unwrap(),
            BootstrapOutcome::AlreadyPresent
        );

        let admin = repo
            .find_by_username(&Username::new("registrar").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(admin.role.is_admin());
    }

    #[tokio::test]
    async fn test_bootstrap_promotes_existing_user() {
        let (repo, config) = setup();
        RegisterUseCase::new(repo.clone(), config.clone())
            .execute(register_input("registrar"))
            .await
            .unwrap();

        let outcome = BootstrapAdminUseCase::new(repo.clone(), config)
            .execute(BootstrapAdminInput {
                username: "Registrar".to_string(),
                email: "ignored@example.com".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .unwrap();

        assert_eq!(outcome, BootstrapOutcome::Promoted);
        assert!(repo.admin_exists().await.unwrap());
    }
}

#[cfg(test)]
mod guard_tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::routing::get;
    use axum::{Router, middleware};
    use kernel::principal::{Access, Principal};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::fake::InMemoryAuth;
    use crate::application::{AuthConfig, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase};
    use crate::domain::repository::UserRepository;
    use crate::presentation::{AuthAppState, auth_routes, require_access};

    fn app(state: &AuthAppState<InMemoryAuth>) -> Router {
        let groups = auth_routes(state.clone());
        let admin = Router::new().route(
            "/admin/ping",
            get(|principal: Principal| async move { principal.user_id.to_string() }),
        );

        Router::new()
            .merge(groups.public)
            .merge(groups.member.route_layer(middleware::from_fn_with_state(
                state.guard(Access::Member),
                require_access::<InMemoryAuth>,
            )))
            .merge(admin.route_layer(middleware::from_fn_with_state(
                state.guard(Access::Admin),
                require_access::<InMemoryAuth>,
            )))
    }

    async fn token_for(state: &AuthAppState<InMemoryAuth>, username: &str, admin: bool) -> String {
        let user = RegisterUseCase::new(state.repo.clone(), state.config.clone())
            .execute(RegisterInput {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "Renewal-Ready-42".to_string(),
                phone: None,
            })
            .await
            .unwrap();
        if admin {
            let mut user = user;
            user.promote_to_admin();
            state.repo.update_user(&user).await.unwrap();
        }
        LoginUseCase::new(state.repo.clone(), state.config.clone())
            .execute(
                LoginInput {
                    identifier: username.to_string(),
                    password: "Renewal-Ready-42".to_string(),
                },
                Default::default(),
            )
            .await
            .unwrap()
            .access_token
    }

    fn get_with(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn state() -> AuthAppState<InMemoryAuth> {
        AuthAppState::new(InMemoryAuth::default(), AuthConfig::development())
    }

    #[tokio::test]
    async fn test_missing_token_is_401_with_error_body() {
        let state = state();
        let response = app(&state).oneshot(get_with("/profile", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Missing bearer token");
    }

    #[tokio::test]
    async fn test_valid_token_reaches_profile() {
        let state = state();
        let token = token_for(&state, "candidate01", false).await;

        let response = app(&state)
            .oneshot(get_with("/profile", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["username"], "candidate01");
        assert_eq!(body["role"], "student");
    }

    #[tokio::test]
    async fn test_student_is_forbidden_from_admin_group() {
        let state = state();
        let token = token_for(&state, "candidate01", false).await;

        let response = app(&state)
            .oneshot(get_with("/admin/ping", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_passes_admin_group() {
        let state = state();
        let token = token_for(&state, "registrar", true).await;

        let response = app(&state)
            .oneshot(get_with("/admin/ping", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_endpoint_returns_201() {
        let state = state();
        let request = Request::builder()
            .method("POST")
            .uri("/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"username":"candidate01","email":"c1@example.com","password":"Renewal-Ready-42"}"#,
            ))
            .unwrap();

        let response = app(&state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["email"], "c1@example.com");
    }

    #[tokio::test]
    async fn test_login_endpoint_returns_bearer_token() {
        let state = state();
        token_for(&state, "candidate01", false).await;
        let request = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"username":"candidate01","password":"Renewal-Ready-42"}"#,
            ))
            .unwrap();

        let response = app(&state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["token_type"], "Bearer");
        assert!(body["access_token"].as_str().unwrap().contains('.'));
        assert_eq!(body["user"]["username"], "candidate01");
    }
}

#[cfg(test)]
mod dto_tests {
    use crate::domain::entity::User;
    use crate::domain::value_object::{Email, Phone, Username};
    use crate::presentation::dto::*;

    #[test]
    fn test_user_response_serialization() {
        let user = User::new(
            Username::new("Candidate01").unwrap(),
            Email::new("c1@example.com").unwrap(),
            Some(Phone::new("555-0100").unwrap()),
        );
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert_eq!(json["id"], user.user_id.to_string());
        assert_eq!(json["username"], "Candidate01");
        assert_eq!(json["phone"], "555-0100");
        assert_eq!(json["role"], "student");
        assert!(json["last_login_at"].is_null());
    }

    #[test]
    fn test_login_request_accepts_identifier_alias() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"identifier":"c1@example.com","password":"x"}"#).unwrap();
        assert_eq!(req.username, "c1@example.com");
    }

    #[test]
    fn test_update_profile_request_all_optional() {
        let req: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        assert!(req.email.is_none());
        assert!(req.new_password.is_none());
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::AuthError;
    use kernel::error::app_error::AppError;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::UserNotFound.kind().status_code(), 404);
        assert_eq!(AuthError::UsernameTaken.kind().status_code(), 409);
        assert_eq!(AuthError::InvalidCredentials.kind().status_code(), 401);
        assert_eq!(AuthError::TokenMissing.kind().status_code(), 401);
        assert_eq!(AuthError::AccountLocked.kind().status_code(), 403);
        assert_eq!(AuthError::Forbidden.kind().status_code(), 403);
        assert_eq!(AuthError::CurrentPasswordRequired.kind().status_code(), 400);
        assert_eq!(AuthError::Internal("x".into()).kind().status_code(), 500);
    }

    #[test]
    fn test_app_error_passthrough() {
        let err = AuthError::from(AppError::bad_request("Invalid email"));
        assert_eq!(err.kind().status_code(), 400);
        assert_eq!(err.to_app_error().message(), "Invalid email");
    }

    #[test]
    fn test_session_errors_carry_action() {
        assert!(AuthError::SessionInvalid.to_app_error().action().is_some());
        assert!(AuthError::UserNotFound.to_app_error().action().is_none());
    }
}
