//! Score Router

use axum::{
    Router,
    routing::{get, post, put},
};
use kernel::routing::RouteGroups;

use crate::domain::repository::ScoreRepository;
use crate::presentation::handlers::{self, ScoreAppState};

/// Score routes; everything but `/my-scores` is admin-only
pub fn score_routes<R>(state: ScoreAppState<R>) -> RouteGroups
where
    R: ScoreRepository + Clone + Send + Sync + 'static,
{
    let member = Router::new()
        .route("/my-scores", get(handlers::my_scores::<R>))
        .with_state(state.clone());

    let admin = Router::new()
        .route("/scores/import", post(handlers::import_scores::<R>))
        .route(
            "/scores/{id}",
            put(handlers::update_score::<R>).delete(handlers::delete_score::<R>),
        )
        .route("/exams/{id}/scores", get(handlers::list_exam_scores::<R>))
        .with_state(state);

    RouteGroups::new(Router::new(), member, admin)
}
