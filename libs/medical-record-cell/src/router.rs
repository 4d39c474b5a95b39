use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn medical_history_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/verify/{patient_id}", get(handlers::verify_medical_history));

    let protected_routes = Router::new()
        .route("/", post(handlers::create_medical_history))
        .route(
            "/{patient_id}",
            get(handlers::get_medical_history).delete(handlers::delete_medical_history),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

pub fn diagnostic_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_diagnostic))
        .route("/{patient_id}", get(handlers::get_patient_diagnostics))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

pub fn template_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::list_templates))
        .route("/{template_id}", get(handlers::get_template));

    let protected_routes = Router::new()
        .route("/", post(handlers::create_template))
        .route(
            "/{template_id}",
            put(handlers::update_template).delete(handlers::delete_template),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

pub fn treatment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/diagnostic/{patient_diagnostic_id}",
            get(handlers::get_treatments_for_diagnostic),
        )
        .route("/", post(handlers::create_treatment))
        .route(
            "/{treatment_id}",
            put(handlers::update_treatment).delete(handlers::delete_treatment),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
