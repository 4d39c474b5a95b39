use std::sync::Arc;

use axum::extract::{Extension, Json, State};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;
use shared_utils::extractor::{require_role, AppJson, AppPath};

use crate::models::{
    AppointmentDetails, AppointmentError, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::services::AppointmentService;

/// Maps the appointment domain errors onto HTTP-facing errors.
pub fn to_app_error(err: AppointmentError) -> AppError {
    match err {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found.".to_string()),
        AppointmentError::InvalidDoctor => AppError::BadRequest("Invalid doctor ID.".to_string()),
        AppointmentError::PatientMismatch => AppError::Unauthorized(
            "Patients can only book appointments for themselves.".to_string(),
        ),
        AppointmentError::UpdateNotPermitted => AppError::Unauthorized(
            "You are not authorized to update this appointment.".to_string(),
        ),
        AppointmentError::CancelNotPermitted => AppError::Unauthorized(
            "You are not authorized to cancel this appointment.".to_string(),
        ),
        AppointmentError::UnlinkedAssistantUpdate => AppError::Unauthorized(
            "You are not authorized to manage this doctor's appointments.".to_string(),
        ),
        AppointmentError::UnlinkedAssistantCancel => AppError::Unauthorized(
            "You are not authorized to cancel this doctor's appointments.".to_string(),
        ),
        AppointmentError::App(e) => e,
    }
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Patient])?;

    let service = AppointmentService::new(&config);
    let appointment = service.book(&user, request).await.map_err(to_app_error)?;

    Ok(Json(json!({
        "Message": "Appointment created successfully.",
        "AppointmentId": appointment.id
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(config): State<Arc<AppConfig>>,
    Extension(_user): Extension<AuthUser>,
    AppPath(appointment_id): AppPath<i64>,
) -> Result<Json<AppointmentDetails>, AppError> {
    let service = AppointmentService::new(&config);
    let appointment = service.get(appointment_id).await.map_err(to_app_error)?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(appointment_id): AppPath<i64>,
    AppJson(request): AppJson<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor, Role::Assistant])?;

    let service = AppointmentService::new(&config);
    service
        .update(&user, appointment_id, request)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "Message": format!("Appointment {} updated successfully.", appointment_id)
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(appointment_id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&config);
    service
        .cancel(&user, appointment_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!({
        "Message": format!(
            "Appointment {} cancelled successfully by {}.",
            appointment_id, user.role
        )
    })))
}
