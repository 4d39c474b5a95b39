use std::sync::Arc;

use axum::extract::{Extension, Json, State};
use serde_json::{json, Value};

use appointment_cell::handlers::to_app_error;
use appointment_cell::models::Appointment;
use appointment_cell::AppointmentService;
use shared_config::AppConfig;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;
use shared_utils::extractor::{require_role, AppJson, AppPath};

use crate::models::{DoctorListing, DoctorSchedule, PatientContact, ScheduleRequest};
use crate::services::{AssistantService, DoctorService, ScheduleService};

// ==============================================================================
// DOCTOR DIRECTORY
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Vec<DoctorListing>>, AppError> {
    let service = DoctorService::new(&config);
    Ok(Json(service.list_doctors().await?))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(config): State<Arc<AppConfig>>,
    Extension(_user): Extension<AuthUser>,
    AppPath(doctor_id): AppPath<i64>,
) -> Result<Json<DoctorListing>, AppError> {
    let service = DoctorService::new(&config);
    Ok(Json(service.get_doctor(doctor_id).await?))
}

#[axum::debug_handler]
pub async fn get_my_appointments(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = AppointmentService::new(&config);
    let appointments = service.for_doctor(user.id).await.map_err(to_app_error)?;

    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn get_my_patients(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<PatientContact>>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = DoctorService::new(&config);
    Ok(Json(service.patients_of(user.id).await?))
}

// ==============================================================================
// SCHEDULES
// ==============================================================================

#[axum::debug_handler]
pub async fn list_schedules(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<DoctorSchedule>>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = ScheduleService::new(&config);
    Ok(Json(service.list_own(&user).await?))
}

#[axum::debug_handler]
pub async fn create_schedule(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<ScheduleRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = ScheduleService::new(&config);
    let schedule = service.create(&user, request).await?;

    Ok(Json(json!({
        "Message": "Schedule created successfully.",
        "ScheduleId": schedule.id
    })))
}

#[axum::debug_handler]
pub async fn update_schedule(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(schedule_id): AppPath<i64>,
    AppJson(request): AppJson<ScheduleRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = ScheduleService::new(&config);
    service.update(&user, schedule_id, request).await?;

    Ok(Json(json!({ "Message": "Schedule updated successfully." })))
}

#[axum::debug_handler]
pub async fn delete_schedule(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(schedule_id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = ScheduleService::new(&config);
    service.delete(&user, schedule_id).await?;

    Ok(Json(json!({ "Message": "Schedule deleted successfully." })))
}

// ==============================================================================
// ASSISTANTS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_my_doctors(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<DoctorListing>>, AppError> {
    require_role(&user, &[Role::Assistant])?;

    let service = AssistantService::new(&config);
    Ok(Json(service.doctors_of(&user).await?))
}

#[axum::debug_handler]
pub async fn assign_assistant(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(assistant_id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = AssistantService::new(&config);
    service.assign(&user, assistant_id).await?;

    Ok(Json(json!({ "Message": "Assistant assigned successfully." })))
}

#[axum::debug_handler]
pub async fn remove_assistant(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(assistant_id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = AssistantService::new(&config);
    service.remove(&user, assistant_id).await?;

    Ok(Json(json!({ "Message": "Assistant removed successfully." })))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments_for_assistant(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(doctor_id): AppPath<i64>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    require_role(&user, &[Role::Assistant])?;

    let service = AssistantService::new(&config);
    Ok(Json(service.appointments_for_doctor(&user, doctor_id).await?))
}
