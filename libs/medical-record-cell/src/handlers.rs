use std::sync::Arc;

use axum::extract::{Extension, Json, State};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;
use shared_utils::extractor::{require_role, AppJson, AppPath};

use crate::models::{
    CreateDiagnosticRequest, CreateMedicalHistoryRequest, CreateTreatmentRequest,
    DiagnosticTemplateView, MedicalHistoryView, PatientDiagnostic, TemplateRequest, Treatment,
    UpdateTreatmentRequest,
};
use crate::policy::ensure_patient_scope;
use crate::services::{DiagnosticService, MedicalHistoryService, TemplateService, TreatmentService};

// ==============================================================================
// MEDICAL HISTORY
// ==============================================================================

#[axum::debug_handler]
pub async fn create_medical_history(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<CreateMedicalHistoryRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor, Role::Assistant])?;

    let service = MedicalHistoryService::new(&config);
    let history = service.create(request.patient_id).await?;

    Ok(Json(json!({
        "Message": "Medical history created successfully.",
        "MedicalHistoryId": history.id
    })))
}

#[axum::debug_handler]
pub async fn verify_medical_history(
    State(config): State<Arc<AppConfig>>,
    AppPath(patient_id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    let service = MedicalHistoryService::new(&config);
    let history_id = service.verify(patient_id).await?;

    Ok(Json(json!({ "MedicalHistoryId": history_id })))
}

#[axum::debug_handler]
pub async fn get_medical_history(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(patient_id): AppPath<i64>,
) -> Result<Json<MedicalHistoryView>, AppError> {
    require_role(&user, &[Role::Patient, Role::Doctor])?;
    ensure_patient_scope(&user, patient_id, "You can only view your own medical history.")?;

    let service = MedicalHistoryService::new(&config);
    Ok(Json(service.aggregate(patient_id).await?))
}

#[axum::debug_handler]
pub async fn delete_medical_history(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(patient_id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = MedicalHistoryService::new(&config);
    service.delete(patient_id).await?;

    Ok(Json(json!({ "Message": "Medical history deleted successfully." })))
}

// ==============================================================================
// DIAGNOSTICS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_diagnostic(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<CreateDiagnosticRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = DiagnosticService::new(&config);
    let diagnostic = service.create(&user, request).await?;

    Ok(Json(json!({
        "Message": "Diagnostic added successfully.",
        "DiagnosticId": diagnostic.id
    })))
}

#[axum::debug_handler]
pub async fn get_patient_diagnostics(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(patient_id): AppPath<i64>,
) -> Result<Json<Vec<PatientDiagnostic>>, AppError> {
    require_role(&user, &[Role::Patient])?;
    ensure_patient_scope(&user, patient_id, "You can only view your own diagnostics.")?;

    let service = DiagnosticService::new(&config);
    Ok(Json(service.for_patient(patient_id).await?))
}

// ==============================================================================
// DIAGNOSTIC TEMPLATES
// ==============================================================================

#[axum::debug_handler]
pub async fn list_templates(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Vec<DiagnosticTemplateView>>, AppError> {
    let service = TemplateService::new(&config);
    Ok(Json(service.list().await?))
}

#[axum::debug_handler]
pub async fn get_template(
    State(config): State<Arc<AppConfig>>,
    AppPath(template_id): AppPath<i64>,
) -> Result<Json<DiagnosticTemplateView>, AppError> {
    let service = TemplateService::new(&config);
    Ok(Json(service.get(template_id).await?))
}

#[axum::debug_handler]
pub async fn create_template(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<TemplateRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = TemplateService::new(&config);
    let template = service.create(&user, request).await?;

    Ok(Json(json!({
        "Message": "Diagnostic template created successfully.",
        "TemplateId": template.id
    })))
}

#[axum::debug_handler]
pub async fn update_template(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(template_id): AppPath<i64>,
    AppJson(request): AppJson<TemplateRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = TemplateService::new(&config);
    service.update(&user, template_id, request).await?;

    Ok(Json(json!({ "Message": "Diagnostic template updated successfully." })))
}

#[axum::debug_handler]
pub async fn delete_template(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(template_id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = TemplateService::new(&config);
    service.delete(&user, template_id).await?;

    Ok(Json(json!({ "Message": "Diagnostic template deleted successfully." })))
}

// ==============================================================================
// TREATMENTS
// ==============================================================================

const TREATMENT_ROLES: &[Role] = &[Role::Doctor, Role::Assistant];

#[axum::debug_handler]
pub async fn get_treatments_for_diagnostic(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(patient_diagnostic_id): AppPath<i64>,
) -> Result<Json<Vec<Treatment>>, AppError> {
    require_role(&user, TREATMENT_ROLES)?;

    let service = TreatmentService::new(&config);
    Ok(Json(service.for_diagnostic(patient_diagnostic_id).await?))
}

#[axum::debug_handler]
pub async fn create_treatment(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<CreateTreatmentRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, TREATMENT_ROLES)?;

    let service = TreatmentService::new(&config);
    let treatment = service.create(request).await?;

    Ok(Json(json!({
        "Message": "Treatment created successfully.",
        "TreatmentId": treatment.id
    })))
}

#[axum::debug_handler]
pub async fn update_treatment(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(treatment_id): AppPath<i64>,
    AppJson(request): AppJson<UpdateTreatmentRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, TREATMENT_ROLES)?;

    let service = TreatmentService::new(&config);
    service.update(treatment_id, request).await?;

    Ok(Json(json!({ "Message": "Treatment updated successfully." })))
}

#[axum::debug_handler]
pub async fn delete_treatment(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(treatment_id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, TREATMENT_ROLES)?;

    let service = TreatmentService::new(&config);
    service.delete(treatment_id).await?;

    Ok(Json(json!({ "Message": "Treatment deleted successfully." })))
}
