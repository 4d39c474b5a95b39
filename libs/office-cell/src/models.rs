use serde::{Deserialize, Serialize};

use shared_models::error::ValidationErrors;
use shared_models::user::User;
use shared_utils::validation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Office {
    pub id: i64,
    pub name: Option<String>,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// Office plus the ids of doctors working there.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeDto {
    pub id: i64,
    pub name: Option<String>,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub doctor_ids: Vec<i64>,
}

impl OfficeDto {
    pub fn new(office: Office, doctor_ids: Vec<i64>) -> Self {
        Self {
            id: office.id,
            name: office.name,
            address: office.address,
            city: office.city,
            state: office.state,
            zip_code: office.zip_code,
            doctor_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeDoctor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub specialization: Option<String>,
}

impl From<User> for OfficeDoctor {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            specialization: user.specialization,
        }
    }
}

/// Body for both create and full update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfficeRequest {
    pub name: Option<String>,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl OfficeRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validation::required(&mut errors, "Address", &self.address);
        validation::max_length(&mut errors, "Address", &self.address, 255);

        let optional = [
            ("Name", &self.name, 255),
            ("City", &self.city, 100),
            ("State", &self.state, 100),
            ("ZipCode", &self.zip_code, 20),
        ];
        for (field, value, max) in optional {
            if let Some(value) = value {
                validation::max_length(&mut errors, field, value, max);
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_is_required() {
        let errors = OfficeRequest::default().validate();
        assert!(errors.contains("Address"));
    }

    #[test]
    fn test_zip_code_length_is_capped() {
        let request = OfficeRequest {
            address: "1 Main St".to_string(),
            zip_code: Some("1".repeat(21)),
            ..Default::default()
        };

        let errors = request.validate();

        assert!(errors.contains("ZipCode"));
        assert!(!errors.contains("Address"));
    }
}
