//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use auth::application::{BootstrapAdminUseCase, BootstrapOutcome};
use auth::domain::repository::SessionRepository;
use auth::{AuthAppState, PgAuthRepository, auth_routes, require_access};
use axum::{
    Router, http,
    http::{Method, header},
    middleware,
};
use certificate::{
    CertificateAppState, ExpireOverdueUseCase, PgCertificateRepository, certificate_routes,
};
use exam::{ExamAppState, PgExamRepository, exam_routes};
use kernel::principal::Access;
use score::{PgScoreRepository, ScoreAppState, score_routes};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "api=info,auth=info,exam=info,score=info,certificate=info,tower_http=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    startup_sweeps(&pool).await;

    let auth_state = AuthAppState::new(PgAuthRepository::new(pool.clone()), config.auth);

    if let Some(input) = config.bootstrap_admin {
        let outcome = BootstrapAdminUseCase::new(auth_state.repo.clone(), auth_state.config.clone())
            .execute(input)
            .await
            .map_err(|e| anyhow::anyhow!("Admin bootstrap failed: {e}"))?;
        if outcome == BootstrapOutcome::AlreadyPresent {
            tracing::info!("Admin account already present, bootstrap skipped");
        }
    }

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Route groups of every domain, guarded once per access level
    let groups = auth_routes(auth_state.clone())
        .merge(exam_routes(ExamAppState::new(PgExamRepository::new(
            pool.clone(),
        ))))
        .merge(score_routes(ScoreAppState::new(PgScoreRepository::new(
            pool.clone(),
        ))))
        .merge(certificate_routes(CertificateAppState::new(
            PgCertificateRepository::new(pool.clone()),
            config.certificate,
        )));

    let member = groups.member.route_layer(middleware::from_fn_with_state(
        auth_state.guard(Access::Member),
        require_access::<PgAuthRepository>,
    ));
    let admin = groups.admin.route_layer(middleware::from_fn_with_state(
        auth_state.guard(Access::Admin),
        require_access::<PgAuthRepository>,
    ));

    let app = Router::new()
        .nest("/api", groups.public.merge(member).merge(admin))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Housekeeping that must not prevent startup
async fn startup_sweeps(pool: &PgPool) {
    let auth_store = PgAuthRepository::new(pool.clone());
    match auth_store.cleanup_expired_sessions().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Auth session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Auth session cleanup failed, continuing anyway");
        }
    }

    let certificates = Arc::new(PgCertificateRepository::new(pool.clone()));
    match ExpireOverdueUseCase::new(certificates)
        .execute(chrono::Utc::now())
        .await
    {
        Ok(expired) => {
            tracing::info!(certificates_expired = expired, "Certificate expiry sweep completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Certificate expiry sweep failed, continuing anyway");
        }
    }
}
