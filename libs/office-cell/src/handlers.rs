use std::sync::Arc;

use axum::extract::{Extension, Json, State};
use axum::http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;
use shared_utils::extractor::{require_role, AppJson, AppPath};

use crate::models::{OfficeDoctor, OfficeDto, OfficeRequest};
use crate::services::OfficeService;

#[axum::debug_handler]
pub async fn list_offices(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Vec<OfficeDto>>, AppError> {
    let service = OfficeService::new(&config);
    Ok(Json(service.list().await?))
}

#[axum::debug_handler]
pub async fn get_office(
    State(config): State<Arc<AppConfig>>,
    AppPath(office_id): AppPath<i64>,
) -> Result<Json<OfficeDto>, AppError> {
    let service = OfficeService::new(&config);
    Ok(Json(service.get(office_id).await?))
}

#[axum::debug_handler]
pub async fn get_office_doctors(
    State(config): State<Arc<AppConfig>>,
    AppPath(office_id): AppPath<i64>,
) -> Result<Json<Vec<OfficeDoctor>>, AppError> {
    let service = OfficeService::new(&config);
    Ok(Json(service.doctors(office_id).await?))
}

#[axum::debug_handler]
pub async fn create_office(
    State(config): State<Arc<AppConfig>>,
    Extension(_user): Extension<AuthUser>,
    AppJson(request): AppJson<OfficeRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Value>), AppError> {
    let service = OfficeService::new(&config);
    let office = service.create(request).await?;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/api/offices/{}", office.id))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    headers.insert(LOCATION, location);

    Ok((
        StatusCode::CREATED,
        headers,
        Json(json!({
            "Message": "Office created successfully.",
            "OfficeId": office.id
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_office(
    State(config): State<Arc<AppConfig>>,
    Extension(_user): Extension<AuthUser>,
    AppPath(office_id): AppPath<i64>,
    AppJson(request): AppJson<OfficeRequest>,
) -> Result<Json<Value>, AppError> {
    let service = OfficeService::new(&config);
    service.update(office_id, request).await?;

    Ok(Json(json!({ "Message": "Office updated successfully." })))
}

#[axum::debug_handler]
pub async fn delete_office(
    State(config): State<Arc<AppConfig>>,
    Extension(_user): Extension<AuthUser>,
    AppPath(office_id): AppPath<i64>,
) -> Result<Json<Value>, AppError> {
    let service = OfficeService::new(&config);
    service.delete(office_id).await?;

    Ok(Json(json!({ "Message": "Office deleted successfully." })))
}

#[axum::debug_handler]
pub async fn assign_doctor(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath((office_id, doctor_id)): AppPath<(i64, i64)>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = OfficeService::new(&config);
    service.assign_doctor(office_id, doctor_id).await?;

    Ok(Json(json!({ "Message": "Doctor assigned to office successfully." })))
}

#[axum::debug_handler]
pub async fn unassign_doctor(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath((office_id, doctor_id)): AppPath<(i64, i64)>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let service = OfficeService::new(&config);
    service.unassign_doctor(office_id, doctor_id).await?;

    Ok(Json(json!({ "Message": "Doctor removed from office successfully." })))
}
