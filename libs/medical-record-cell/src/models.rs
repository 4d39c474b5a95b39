use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::error::ValidationErrors;
use shared_utils::validation;

pub const TEMPLATE_NAME_MAX: usize = 200;
pub const TREATMENT_DESCRIPTION_MAX: usize = 500;

// Rows are read with their snake_case column names and written to clients
// in camelCase.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct MedicalHistory {
    pub id: i64,
    pub patient_id: i64,
}

/// Appointment as listed inside a patient's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct HistoryAppointment {
    pub id: i64,
    pub appointment_date: DateTime<Utc>,
    pub doctor_id: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct PatientDiagnostic {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub diagnostic_template_id: i64,
    pub date_diagnosed: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistoryView {
    pub id: i64,
    pub patient_id: i64,
    pub appointments: Vec<HistoryAppointment>,
    pub patient_diagnostics: Vec<PatientDiagnostic>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicalHistoryRequest {
    pub patient_id: i64,
}

/// Any doctor id in the body is ignored; the caller's token decides.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiagnosticRequest {
    pub patient_id: i64,
    pub diagnostic_template_id: i64,
    pub date_diagnosed: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct DiagnosticTemplate {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_by_doctor_id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticTemplateView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_by_doctor_id: i64,
    pub created_by_doctor_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

impl TemplateRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validation::required(&mut errors, "Name", &self.name);
        validation::max_length(&mut errors, "Name", &self.name, TEMPLATE_NAME_MAX);
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Treatment {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub patient_diagnostic_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTreatmentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub patient_diagnostic_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

impl CreateTreatmentRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validation::required(&mut errors, "Name", &self.name);
        validation::required(&mut errors, "Description", &self.description);
        validation::max_length(
            &mut errors,
            "Description",
            &self.description,
            TREATMENT_DESCRIPTION_MAX,
        );
        errors
    }
}

/// Empty strings and missing values leave the stored column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTreatmentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl UpdateTreatmentRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if let Some(description) = &self.description {
            validation::max_length(
                &mut errors,
                "Description",
                description,
                TREATMENT_DESCRIPTION_MAX,
            );
        }
        errors
    }
}
