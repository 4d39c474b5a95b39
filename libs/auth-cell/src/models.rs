use chrono::{DateTime, Utc};
use serde::Deserialize;

use shared_models::auth::Role;
use shared_models::error::ValidationErrors;
use shared_utils::validation;

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Role,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub phone_number: Option<String>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub office_id: Option<i64>,
}

impl RegisterRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validation::required(&mut errors, "FirstName", &self.first_name);
        validation::required(&mut errors, "LastName", &self.last_name);
        validation::email(&mut errors, "Email", &self.email);
        if self.password.is_empty() {
            validation::required(&mut errors, "Password", &self.password);
        } else {
            validation::min_length(&mut errors, "Password", &self.password, MIN_PASSWORD_LENGTH);
        }
        errors
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
