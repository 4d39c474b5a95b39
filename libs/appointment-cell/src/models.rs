use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;
use shared_models::user::UserSummary;

// ==============================================================================
// APPOINTMENT MODELS
// ==============================================================================

/// Row of the `appointments` table; also the list shape sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Appointment {
    pub id: i64,
    pub appointment_date: DateTime<Utc>,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub notes: Option<String>,
}

/// Single appointment with both participants expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    pub id: i64,
    pub appointment_date: DateTime<Utc>,
    pub doctor: Option<UserSummary>,
    pub patient: Option<UserSummary>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub doctor_id: i64,
    pub patient_id: i64,
    pub appointment_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub appointment_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Invalid doctor")]
    InvalidDoctor,

    #[error("Patient may only book for themselves")]
    PatientMismatch,

    #[error("Caller may not update this appointment")]
    UpdateNotPermitted,

    #[error("Caller may not cancel this appointment")]
    CancelNotPermitted,

    #[error("Assistant is not linked to the appointment's doctor")]
    UnlinkedAssistantUpdate,

    #[error("Assistant is not linked to the appointment's doctor")]
    UnlinkedAssistantCancel,

    #[error(transparent)]
    App(#[from] AppError),
}

impl From<anyhow::Error> for AppointmentError {
    fn from(err: anyhow::Error) -> Self {
        AppointmentError::App(AppError::from(err))
    }
}
