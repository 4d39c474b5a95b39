use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn office_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::list_offices))
        .route("/{id}", get(handlers::get_office))
        .route("/{id}/doctors", get(handlers::get_office_doctors));

    let protected_routes = Router::new()
        .route("/", post(handlers::create_office))
        .route(
            "/{id}",
            put(handlers::update_office).delete(handlers::delete_office),
        )
        .route(
            "/{id}/doctors/{doctor_id}",
            put(handlers::assign_doctor).delete(handlers::unassign_doctor),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
