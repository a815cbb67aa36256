//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use kernel::routing::RouteGroups;

use crate::domain::repository::{CredentialRepository, SessionRepository, UserRepository};
use crate::presentation::handlers::{self, AuthAppState};

/// Auth routes split by access level
pub fn auth_routes<R>(state: AuthAppState<R>) -> RouteGroups
where
    R: UserRepository + CredentialRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let public = Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .with_state(state.clone());

    let member = Router::new()
        .route("/logout", post(handlers::logout::<R>))
        .route(
            "/profile",
            get(handlers::get_profile::<R>).put(handlers::update_profile::<R>),
        )
        .with_state(state);

    RouteGroups::new(public, member, Router::new())
}
