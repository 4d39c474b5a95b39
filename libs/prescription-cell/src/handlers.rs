use std::sync::Arc;

use axum::extract::{Extension, Json, State};
use axum::http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;
use shared_utils::extractor::{require_role, AppJson, AppPath};

use crate::models::{
    CreatePrescriptionRequest, MedicationRequest, PrescriptionDto, UpdateMedicationRequest,
    UpdatePrescriptionRequest,
};
use crate::services::{MedicationService, PrescriptionService};

const READ_ROLES: &[Role] = &[Role::Doctor, Role::Patient];

// ==============================================================================
// PRESCRIPTIONS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_prescription(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<CreatePrescriptionRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Value>), AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = PrescriptionService::new(&config);
    let prescription = service.create(&user, request).await?;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/api/prescriptions/{}", prescription.id))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    headers.insert(LOCATION, location);

    Ok((
        StatusCode::CREATED,
        headers,
        Json(json!({
            "Message": "Prescription created successfully.",
            "PrescriptionId": prescription.id
        })),
    ))
}

#[axum::debug_handler]
pub async fn get_prescription(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(prescription_id): AppPath<i64>,
) -> Result<Json<PrescriptionDto>, AppError> {
    require_role(&user, READ_ROLES)?;

    let service = PrescriptionService::new(&config);
    Ok(Json(service.get(prescription_id).await?))
}

#[axum::debug_handler]
pub async fn get_prescriptions_for_patient(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(patient_id): AppPath<i64>,
) -> Result<Json<Vec<PrescriptionDto>>, AppError> {
    require_role(&user, READ_ROLES)?;

    let service = PrescriptionService::new(&config);
    Ok(Json(service.for_patient(&user, patient_id).await?))
}

#[axum::debug_handler]
pub async fn get_prescriptions_for_appointment(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(appointment_id): AppPath<i64>,
) -> Result<Json<Vec<PrescriptionDto>>, AppError> {
    require_role(&user, READ_ROLES)?;

    let service = PrescriptionService::new(&config);
    Ok(Json(service.for_appointment(appointment_id).await?))
}

#[axum::debug_handler]
pub async fn update_prescription(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(prescription_id): AppPath<i64>,
    AppJson(request): AppJson<UpdatePrescriptionRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = PrescriptionService::new(&config);
    service.update(&user, prescription_id, request).await?;

    Ok(Json(json!({ "Message": "Prescription updated successfully." })))
}

#[axum::debug_handler]
pub async fn delete_prescription(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(prescription_id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = PrescriptionService::new(&config);
    service.delete(&user, prescription_id).await?;

    Ok(Json(json!({ "Message": "Prescription deleted successfully." })))
}

// ==============================================================================
// MEDICATIONS
// ==============================================================================

#[axum::debug_handler]
pub async fn add_medication(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(prescription_id): AppPath<i64>,
    AppJson(request): AppJson<MedicationRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = MedicationService::new(&config);
    let medication = service.add(&user, prescription_id, request).await?;

    Ok(Json(json!({
        "Message": "Medication added successfully.",
        "MedicationId": medication.id
    })))
}

#[axum::debug_handler]
pub async fn update_medication(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(medication_id): AppPath<i64>,
    AppJson(request): AppJson<UpdateMedicationRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = MedicationService::new(&config);
    service.update(&user, medication_id, request).await?;

    Ok(Json(json!({ "Message": "Medication updated successfully." })))
}

#[axum::debug_handler]
pub async fn delete_medication(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(medication_id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = MedicationService::new(&config);
    service.delete(&user, medication_id).await?;

    Ok(Json(json!({ "Message": "Medication deleted successfully." })))
}
