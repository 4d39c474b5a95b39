use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn user_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/{user_id}",
            get(handlers::get_user).put(handlers::update_user),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

pub fn patient_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/{patient_id}/appointments", get(handlers::get_patient_appointments))
        .route("/{patient_id}/diagnostics", get(handlers::get_patient_diagnostics))
        .route(
            "/{patient_id}/medicalhistory",
            get(handlers::get_patient_medical_history),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
