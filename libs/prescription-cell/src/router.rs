use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn prescription_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_prescription))
        .route(
            "/{id}",
            get(handlers::get_prescription)
                .put(handlers::update_prescription)
                .delete(handlers::delete_prescription),
        )
        .route("/{id}/medications", post(handlers::add_medication))
        .route("/patient/{id}", get(handlers::get_prescriptions_for_patient))
        .route("/appointment/{id}", get(handlers::get_prescriptions_for_appointment))
        .route(
            "/medications/{id}",
            put(handlers::update_medication).delete(handlers::delete_medication),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
