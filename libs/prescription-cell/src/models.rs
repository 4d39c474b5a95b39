use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shared_models::error::ValidationErrors;
use shared_utils::validation;

pub const DESCRIPTION_MAX: usize = 1000;

// ==============================================================================
// STATUS
// ==============================================================================

/// Lifecycle marker. Any value may replace any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PrescriptionStatus {
    #[default]
    Active,
    Completed,
    Canceled,
}

impl From<PrescriptionStatus> for u8 {
    fn from(status: PrescriptionStatus) -> Self {
        match status {
            PrescriptionStatus::Active => 0,
            PrescriptionStatus::Completed => 1,
            PrescriptionStatus::Canceled => 2,
        }
    }
}

impl TryFrom<u8> for PrescriptionStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(PrescriptionStatus::Active),
            1 => Ok(PrescriptionStatus::Completed),
            2 => Ok(PrescriptionStatus::Canceled),
            other => Err(format!("Unknown prescription status {}", other)),
        }
    }
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrescriptionStatus::Active => "Active",
            PrescriptionStatus::Completed => "Completed",
            PrescriptionStatus::Canceled => "Canceled",
        };
        f.write_str(name)
    }
}

// ==============================================================================
// ROWS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Prescription {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: DateTime<Utc>,
    pub description: String,
    pub appointment_id: Option<i64>,
    pub status: PrescriptionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Medication {
    pub id: i64,
    pub prescription_id: i64,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub notes: Option<String>,
}

// ==============================================================================
// VIEWS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationDto {
    pub id: i64,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub notes: Option<String>,
}

impl From<Medication> for MedicationDto {
    fn from(medication: Medication) -> Self {
        Self {
            id: medication.id,
            name: medication.name,
            dosage: medication.dosage,
            frequency: medication.frequency,
            notes: medication.notes,
        }
    }
}

/// Prescription with participant names and its medications. Names are empty
/// when the user row is gone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionDto {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub patient_name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub status: PrescriptionStatus,
    pub appointment_id: Option<i64>,
    pub medications: Vec<MedicationDto>,
}

// ==============================================================================
// REQUESTS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrescriptionRequest {
    pub patient_id: i64,
    #[serde(default)]
    pub appointment_id: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl CreatePrescriptionRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validation::required(&mut errors, "Description", &self.description);
        validation::max_length(&mut errors, "Description", &self.description, DESCRIPTION_MAX);
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePrescriptionRequest {
    pub description: Option<String>,
    pub status: Option<PrescriptionStatus>,
}

impl UpdatePrescriptionRequest {
    pub fn changes(&self) -> Map<String, Value> {
        let mut changes = Map::new();
        if let Some(description) = &self.description {
            changes.insert("description".to_string(), Value::String(description.clone()));
        }
        if let Some(status) = self.status {
            changes.insert("status".to_string(), Value::from(u8::from(status)));
        }
        changes
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MedicationRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validation::required(&mut errors, "Name", &self.name);
        validation::required(&mut errors, "Dosage", &self.dosage);
        validation::required(&mut errors, "Frequency", &self.frequency);
        errors
    }
}

/// Partial medication edit; blank strings are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateMedicationRequest {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub notes: Option<String>,
}

impl UpdateMedicationRequest {
    pub fn changes(&self) -> Map<String, Value> {
        let fields = [
            ("name", &self.name),
            ("dosage", &self.dosage),
            ("frequency", &self.frequency),
            ("notes", &self.notes),
        ];

        fields
            .into_iter()
            .filter_map(|(column, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| (column.to_string(), Value::String(v.to_string())))
            })
            .collect()
    }
}
