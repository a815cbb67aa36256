//! Exam Router

use axum::{
    Router,
    routing::{get, post},
};
use kernel::routing::RouteGroups;

use crate::presentation::handlers::{self, ExamAppState, ExamStore};

/// Exam, form configuration and application routes split by access level
pub fn exam_routes<R: ExamStore>(state: ExamAppState<R>) -> RouteGroups {
    let public = Router::new()
        .route("/exams", get(handlers::list_exams::<R>))
        .route("/exams/{id}", get(handlers::get_exam::<R>))
        .route("/exams/{id}/form-config", get(handlers::get_form_config::<R>))
        .with_state(state.clone());

    let member = Router::new()
        .route(
            "/applications",
            post(handlers::submit_application::<R>).get(handlers::list_my_applications::<R>),
        )
        .route(
            "/applications/{id}",
            get(handlers::get_application::<R>)
                .put(handlers::update_application::<R>)
                .delete(handlers::withdraw_application::<R>),
        )
        .with_state(state.clone());

    let admin = Router::new()
        .route("/exams", post(handlers::create_exam::<R>))
        .route(
            "/exams/{id}",
            axum::routing::put(handlers::update_exam::<R>).delete(handlers::delete_exam::<R>),
        )
        .route(
            "/exams/{id}/applications",
            get(handlers::list_exam_applications::<R>),
        )
        .route(
            "/exams/{id}/form-config",
            post(handlers::save_form_config::<R>),
        )
        .route(
            "/applications/{id}/approve",
            post(handlers::approve_application::<R>),
        )
        .route(
            "/applications/{id}/reject",
            post(handlers::reject_application::<R>),
        )
        .with_state(state);

    RouteGroups::new(public, member, admin)
}
