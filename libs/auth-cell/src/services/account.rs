use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::{normalize_email, DbClient};
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_models::user::User;
use shared_utils::jwt::issue_token;
use shared_utils::password::PasswordService;

use crate::models::{LoginRequest, RegisterRequest};

pub struct AccountService {
    db: DbClient,
    config: AppConfig,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DbClient::new(config),
            config: config.clone(),
        }
    }

    /// Creates the user and returns it. Emails are unique across all roles.
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        request.validate().into_result()?;

        if self.db.find_user_by_email(&request.email).await?.is_some() {
            return Err(AppError::BadRequest("Email is already registered.".to_string()));
        }

        let hashed = PasswordService::hash_password(&request.password)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user: User = self.db.insert("users", new_user_row(&request, &hashed)).await?;

        info!("Registered user {} as {}", user.id, user.role);
        Ok(user)
    }

    /// Verifies credentials and issues a bearer token.
    pub async fn login(&self, request: LoginRequest) -> Result<String, AppError> {
        let invalid = || AppError::Unauthorized("Invalid email or password.".to_string());

        let user = self
            .db
            .find_user_by_email(&request.email)
            .await?
            .ok_or_else(invalid)?;

        let verified = PasswordService::verify_password(&request.password, &user.password)
            .unwrap_or_else(|e| {
                warn!("Stored password hash for user {} is unreadable: {}", user.id, e);
                false
            });

        if !verified {
            debug!("Password mismatch for user {}", user.id);
            return Err(invalid());
        }

        issue_token(user.id, &user.email, user.role, &self.config).map_err(AppError::Internal)
    }

    pub async fn current_user(&self, user_id: i64) -> Result<User, AppError> {
        self.db
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))
    }
}

/// Role-specific columns are only kept for the role they belong to.
pub fn new_user_row(request: &RegisterRequest, password_hash: &str) -> Value {
    let is_doctor = request.role == Role::Doctor;
    let is_patient = request.role == Role::Patient;

    json!({
        "first_name": request.first_name.trim(),
        "last_name": request.last_name.trim(),
        "email": normalize_email(&request.email),
        "password": password_hash,
        "phone_number": request.phone_number,
        "role": request.role,
        "date_of_birth": if is_patient { request.date_of_birth } else { None },
        "specialization": if is_doctor { request.specialization.clone() } else { None },
        "license_number": if is_doctor { request.license_number.clone() } else { None },
        "office_id": request.office_id
    })
}
