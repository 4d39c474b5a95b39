use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::user::UserDto;
use shared_utils::extractor::AppJson;

use crate::models::{LoginRequest, RegisterRequest};
use crate::services::AccountService;

#[axum::debug_handler]
pub async fn register(
    State(config): State<Arc<AppConfig>>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Value>), AppError> {
    debug!("Registering {} as {}", request.email, request.role);

    let service = AccountService::new(&config);
    let user = service.register(request).await?;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/api/users/{}", user.id))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    headers.insert(LOCATION, location);

    Ok((
        StatusCode::CREATED,
        headers,
        Json(json!({ "Message": "User registered successfully." })),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&config);
    let token = service.login(request).await?;

    Ok(Json(json!({ "Token": token })))
}

#[axum::debug_handler]
pub async fn me(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserDto>, AppError> {
    let service = AccountService::new(&config);
    let profile = service.current_user(user.id).await?;

    Ok(Json(profile.into()))
}
