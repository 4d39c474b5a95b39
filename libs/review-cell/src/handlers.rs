use std::sync::Arc;

use axum::extract::{Extension, Json, State};
use axum::http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;
use shared_utils::extractor::{require_role, AppJson, AppPath};

use crate::models::{CreateReviewRequest, ReviewDto, ReviewSummary};
use crate::services::ReviewService;

#[axum::debug_handler]
pub async fn submit_review(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
    AppPath(doctor_id): AppPath<i64>,
    AppJson(request): AppJson<CreateReviewRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Value>), AppError> {
    require_role(&user, &[Role::Patient])?;

    let service = ReviewService::new(&config);
    service.submit(&user, doctor_id, request).await?;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/api/reviews/{}", doctor_id))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    headers.insert(LOCATION, location);

    Ok((
        StatusCode::CREATED,
        headers,
        Json(json!({ "Message": "Review submitted successfully." })),
    ))
}

#[axum::debug_handler]
pub async fn get_reviews(
    State(config): State<Arc<AppConfig>>,
    AppPath(doctor_id): AppPath<i64>,
) -> Result<Json<Vec<ReviewDto>>, AppError> {
    let service = ReviewService::new(&config);
    Ok(Json(service.for_doctor(doctor_id).await?))
}

#[axum::debug_handler]
pub async fn get_review_summary(
    State(config): State<Arc<AppConfig>>,
    AppPath(doctor_id): AppPath<i64>,
) -> Result<Json<ReviewSummary>, AppError> {
    let service = ReviewService::new(&config);
    Ok(Json(service.summary(doctor_id).await?))
}
