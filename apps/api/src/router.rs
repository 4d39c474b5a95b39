use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::appointment_routes;
use auth_cell::auth_routes;
use doctor_cell::{assistant_routes, doctor_routes};
use medical_record_cell::{
    diagnostic_routes, medical_history_routes, template_routes, treatment_routes,
};
use office_cell::office_routes;
use patient_cell::{patient_routes, user_routes};
use prescription_cell::prescription_routes;
use review_cell::review_routes;
use shared_config::AppConfig;

use crate::info::info_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes(state.clone()))
        .nest("/users", user_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/assistants", assistant_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/medicalhistory", medical_history_routes(state.clone()))
        .nest("/diagnostics", diagnostic_routes(state.clone()))
        .nest("/diagnostictemplates", template_routes(state.clone()))
        .nest("/treatments", treatment_routes(state.clone()))
        .nest("/prescriptions", prescription_routes(state.clone()))
        .nest("/offices", office_routes(state.clone()))
        .nest("/reviews", review_routes(state))
        .nest("/info", info_routes());

    Router::new()
        .route("/", get(|| async { "CareBridge API is running!" }))
        .nest("/api", api)
}
