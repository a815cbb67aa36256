//! Certificate Router

use axum::{
    Router,
    routing::{get, post},
};
use kernel::routing::RouteGroups;

use crate::presentation::handlers::{self, CertificateAppState, CertificateStore};

/// Certificate, renewal and template routes split by access level
pub fn certificate_routes<R: CertificateStore>(state: CertificateAppState<R>) -> RouteGroups {
    let member = Router::new()
        .route(
            "/certificates/my-certificates",
            get(handlers::list_my_certificates::<R>),
        )
        .route("/certificates/{id}", get(handlers::get_certificate::<R>))
        .route(
            "/certificates/renewal-application",
            post(handlers::submit_renewal::<R>),
        )
        .route(
            "/certificates/renewal-applications",
            get(handlers::list_renewals::<R>),
        )
        .route(
            "/certificates/renewal-applications/{id}",
            get(handlers::get_renewal::<R>),
        )
        .route("/certificates/templates", get(handlers::list_templates::<R>))
        .route(
            "/certificates/templates/{id}",
            get(handlers::get_template::<R>),
        )
        .with_state(state.clone());

    let admin = Router::new()
        .route(
            "/certificates/generate",
            post(handlers::generate_certificates::<R>),
        )
        .route(
            "/certificates/import",
            post(handlers::import_certificates::<R>),
        )
        .route(
            "/certificates/exams/{id}/certificates",
            get(handlers::list_exam_certificates::<R>),
        )
        .route(
            "/certificates/{id}/revoke",
            post(handlers::revoke_certificate::<R>),
        )
        .route(
            "/certificates/renewal-applications/{id}/review",
            post(handlers::review_renewal::<R>),
        )
        .route("/certificates/templates", post(handlers::create_template::<R>))
        .route(
            "/certificates/templates/{id}",
            axum::routing::put(handlers::update_template::<R>)
                .delete(handlers::delete_template::<R>),
        )
        .with_state(state);

    RouteGroups::new(Router::new(), member, admin)
}
