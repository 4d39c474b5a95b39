use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, Role};

pub struct TestConfig {
    pub jwt_secret: String,
    pub database_rest_url: String,
    pub database_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            database_rest_url: "http://localhost:54321".to_string(),
            database_api_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_database_url(url: &str) -> Self {
        Self {
            database_rest_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_rest_url: self.database_rest_url.clone(),
            database_api_key: self.database_api_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            jwt_issuer: "CareBridge".to_string(),
            jwt_audience: "CareBridgeUsers".to_string(),
            jwt_expiry_minutes: 60,
            server_port: 5156,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl TestUser {
    pub fn new(id: i64, role: Role) -> Self {
        Self {
            id,
            email: format!("{}{}@example.com", role.as_str().to_lowercase(), id),
            role,
        }
    }

    pub fn doctor(id: i64) -> Self {
        Self::new(id, Role::Doctor)
    }

    pub fn patient(id: i64) -> Self {
        Self::new(id, Role::Patient)
    }

    pub fn assistant(id: i64) -> Self {
        Self::new(id, Role::Assistant)
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(
        user: &TestUser,
        config: &AppConfig,
        exp_minutes: Option<i64>,
    ) -> String {
        Self::sign(user, config, &config.jwt_secret, exp_minutes.unwrap_or(60))
    }

    pub fn create_expired_token(user: &TestUser, config: &AppConfig) -> String {
        Self::sign(user, config, &config.jwt_secret, -5)
    }

    pub fn create_invalid_signature_token(user: &TestUser, config: &AppConfig) -> String {
        Self::sign(user, config, "wrong-secret-wrong-secret-wrong-secret", 60)
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    fn sign(user: &TestUser, config: &AppConfig, secret: &str, exp_minutes: i64) -> String {
        let exp = Utc::now() + Duration::minutes(exp_minutes);

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "nameid": user.id.to_string(),
            "unique_name": user.email,
            "role": user.role.as_str(),
            "exp": exp.timestamp(),
            "iss": config.jwt_issuer,
            "aud": config.jwt_audience
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }
}

/// Row shapes as the database REST API returns them.
pub struct MockDbResponses;

impl MockDbResponses {
    pub fn user_row(id: i64, role: Role, first_name: &str, last_name: &str) -> serde_json::Value {
        let role_code: u8 = role.into();
        json!({
            "id": id,
            "first_name": first_name,
            "last_name": last_name,
            "email": format!(
                "{}.{}@example.com",
                first_name.to_lowercase(),
                last_name.to_lowercase()
            ),
            "password": "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNo",
            "phone_number": null,
            "role": role_code,
            "date_of_birth": if role == Role::Patient { json!("1985-06-15T00:00:00Z") } else { json!(null) },
            "specialization": if role == Role::Doctor { json!("Cardiology") } else { json!(null) },
            "license_number": if role == Role::Doctor { json!("CARD-001") } else { json!(null) },
            "office_id": null
        })
    }

    pub fn appointment_row(id: i64, doctor_id: i64, patient_id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "appointment_date": "2025-03-10T09:30:00Z",
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "notes": "Follow-up"
        })
    }

    pub fn prescription_row(id: i64, doctor_id: i64, patient_id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "date": "2025-03-10T10:00:00Z",
            "description": "Antibiotics course",
            "appointment_id": null,
            "status": 0
        })
    }

    pub fn medication_row(id: i64, prescription_id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "prescription_id": prescription_id,
            "name": "Amoxicillin",
            "dosage": "500mg",
            "frequency": "3x daily",
            "notes": null
        })
    }

    pub fn template_row(id: i64, name: &str, created_by_doctor_id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "description": "Standard checklist",
            "created_by_doctor_id": created_by_doctor_id
        })
    }

    pub fn diagnostic_row(
        id: i64,
        patient_id: i64,
        doctor_id: i64,
        template_id: i64,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "diagnostic_template_id": template_id,
            "date_diagnosed": "2025-03-10T10:00:00Z",
            "notes": null
        })
    }

    pub fn medical_history_row(id: i64, patient_id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "patient_id": patient_id
        })
    }

    pub fn office_row(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Downtown Clinic",
            "address": "100 King St W",
            "city": "Toronto",
            "state": "ON",
            "zip_code": "M5X 1A9"
        })
    }
}
