use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    // Public directory
    let public_routes = Router::new().route("/", get(handlers::list_doctors));

    let protected_routes = Router::new()
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/appointments", get(handlers::get_my_appointments))
        .route("/patients", get(handlers::get_my_patients))
        .route(
            "/schedules",
            get(handlers::list_schedules).post(handlers::create_schedule),
        )
        .route(
            "/schedules/{schedule_id}",
            put(handlers::update_schedule).delete(handlers::delete_schedule),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

/// `{id}` is the assistant for assign/remove and the doctor for appointments.
pub fn assistant_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/my-doctors", get(handlers::get_my_doctors))
        .route("/{id}/assign", post(handlers::assign_assistant))
        .route("/{id}/remove", delete(handlers::remove_assistant))
        .route(
            "/{id}/appointments",
            get(handlers::get_doctor_appointments_for_assistant),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
