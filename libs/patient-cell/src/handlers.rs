use std::sync::Arc;

use axum::extract::{Extension, Json, State};
use serde_json::{json, Value};

use appointment_cell::models::Appointment;
use medical_record_cell::models::{MedicalHistoryView, PatientDiagnostic};
use shared_config::AppConfig;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;
use shared_models::user::UserDto;
use shared_utils::extractor::{require_role, AppJson, AppPath};

use crate::models::UpdateUserRequest;
use crate::services::{PatientRecordService, ProfileService};

// ==============================================================================
// USERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_user(
    State(config): State<Arc<AppConfig>>,
    Extension(_user): Extension<AuthUser>,
    AppPath(user_id): AppPath<i64>,
) -> Result<Json<UserDto>, AppError> {
    let service = ProfileService::new(&config);
    Ok(Json(service.get(user_id).await?))
}

#[axum::debug_handler]
pub async fn update_user(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(user_id): AppPath<i64>,
    AppJson(request): AppJson<UpdateUserRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ProfileService::new(&config);
    service.update(&user, user_id, request).await?;

    Ok(Json(json!({ "Message": "User updated successfully." })))
}

// ==============================================================================
// PATIENT RECORDS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(patient_id): AppPath<i64>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    require_role(&user, &[Role::Patient])?;

    let service = PatientRecordService::new(&config);
    Ok(Json(service.appointments(&user, patient_id).await?))
}

#[axum::debug_handler]
pub async fn get_patient_diagnostics(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(patient_id): AppPath<i64>,
) -> Result<Json<Vec<PatientDiagnostic>>, AppError> {
    require_role(&user, &[Role::Patient, Role::Doctor])?;

    let service = PatientRecordService::new(&config);
    Ok(Json(service.diagnostics(&user, patient_id).await?))
}

#[axum::debug_handler]
pub async fn get_patient_medical_history(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(patient_id): AppPath<i64>,
) -> Result<Json<MedicalHistoryView>, AppError> {
    require_role(&user, &[Role::Patient, Role::Doctor])?;

    let service = PatientRecordService::new(&config);
    Ok(Json(service.medical_history(&user, patient_id).await?))
}
