use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::error::ValidationErrors;
use shared_models::user::User;
use shared_utils::validation;

pub const SCHEDULE_DESCRIPTION_MAX: usize = 500;

// ==============================================================================
// DOCTOR DIRECTORY
// ==============================================================================

/// Public directory entry for a doctor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorListing {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub office_id: Option<i64>,
}

impl From<User> for DoctorListing {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            specialization: user.specialization,
            license_number: user.license_number,
            office_id: user.office_id,
        }
    }
}

/// Contact card of a patient seen by the doctor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientContact {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

impl From<User> for PatientContact {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone_number: user.phone_number,
        }
    }
}

// ==============================================================================
// SCHEDULES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct DoctorSchedule {
    pub id: i64,
    pub doctor_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub description: Option<String>,
}

impl ScheduleRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.start_time >= self.end_time {
            errors.add("EndTime", "The end time must be after the start time.");
        }
        if let Some(description) = &self.description {
            validation::max_length(
                &mut errors,
                "Description",
                description,
                SCHEDULE_DESCRIPTION_MAX,
            );
        }
        errors
    }
}

// ==============================================================================
// DOCTOR-ASSISTANT LINKS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct DoctorAssistant {
    pub id: i64,
    pub doctor_id: i64,
    pub assistant_id: i64,
    pub assigned_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: &str, end: &str) -> ScheduleRequest {
        ScheduleRequest {
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            description: None,
        }
    }

    #[test]
    fn test_schedule_must_end_after_start() {
        assert!(request("2025-03-10T09:00:00Z", "2025-03-10T17:00:00Z").validate().is_empty());
        assert!(request("2025-03-10T17:00:00Z", "2025-03-10T09:00:00Z")
            .validate()
            .contains("EndTime"));
        assert!(!request("2025-03-10T09:00:00Z", "2025-03-10T09:00:00Z")
            .validate()
            .is_empty());
    }
}
