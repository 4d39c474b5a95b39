use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequest, FromRequestParts, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use headers::{authorization::Bearer, Authorization, HeaderMapExt};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// JSON body whose rejections render as `AppError` (validation dictionary
/// for malformed payloads).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters whose rejections render as a 400 `{"Message"}` body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Validates the bearer token and stores the caller as an `AuthUser`
/// request extension.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| {
            AppError::Unauthorized("Missing or invalid authorization header.".to_string())
        })?;

    let user = validate_token(bearer.token(), &config).map_err(AppError::Unauthorized)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Role gate. A caller outside `roles` gets a bare 403.
pub fn require_role(user: &AuthUser, roles: &[Role]) -> Result<(), AppError> {
    if user.has_any_role(roles) {
        Ok(())
    } else {
        debug!("User {} with role {} denied, requires {:?}", user.id, user.role, roles);
        Err(AppError::Forbidden)
    }
}

/// Ownership check: the caller must be the record owner.
pub fn ensure_owner(user: &AuthUser, owner_id: i64, message: &str) -> Result<(), AppError> {
    if user.id == owner_id {
        Ok(())
    } else {
        debug!("User {} is not owner {}", user.id, owner_id);
        Err(AppError::Unauthorized(message.to_string()))
    }
}
