use chrono::Utc;
use serde_json::json;
use tracing::info;

use appointment_cell::handlers::to_app_error;
use appointment_cell::models::Appointment;
use appointment_cell::AppointmentService;
use shared_config::AppConfig;
use shared_database::{in_list, DbClient};
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;
use shared_models::user::User;

use crate::models::{DoctorAssistant, DoctorListing};

/// Doctor-assistant assignments and what they unlock.
pub struct AssistantService {
    db: DbClient,
    appointments: AppointmentService,
}

impl AssistantService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DbClient::new(config),
            appointments: AppointmentService::new(config),
        }
    }

    pub async fn assign(
        &self,
        doctor: &AuthUser,
        assistant_id: i64,
    ) -> Result<DoctorAssistant, AppError> {
        if self
            .db
            .find_user_with_role(assistant_id, Role::Assistant)
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest("Invalid assistant.".to_string()));
        }

        if self.db.assistant_is_linked(doctor.id, assistant_id).await? {
            return Err(AppError::BadRequest(
                "Assistant is already assigned to this doctor.".to_string(),
            ));
        }

        let link: DoctorAssistant = self
            .db
            .insert(
                "doctor_assistants",
                json!({
                    "doctor_id": doctor.id,
                    "assistant_id": assistant_id,
                    "assigned_date": Utc::now()
                }),
            )
            .await?;

        info!("Assistant {} assigned to doctor {}", assistant_id, doctor.id);
        Ok(link)
    }

    pub async fn remove(&self, doctor: &AuthUser, assistant_id: i64) -> Result<(), AppError> {
        let query = format!("doctor_id=eq.{}&assistant_id=eq.{}", doctor.id, assistant_id);
        let removed = self.db.delete("doctor_assistants", &query).await?;

        if removed == 0 {
            return Err(AppError::NotFound(
                "No assignment found for the specified assistant and doctor.".to_string(),
            ));
        }

        info!("Assistant {} removed from doctor {}", assistant_id, doctor.id);
        Ok(())
    }

    pub async fn doctors_of(&self, assistant: &AuthUser) -> Result<Vec<DoctorListing>, AppError> {
        let links: Vec<DoctorAssistant> = self
            .db
            .select("doctor_assistants", &format!("assistant_id=eq.{}", assistant.id))
            .await?;

        let doctor_ids: Vec<i64> = links.iter().map(|link| link.doctor_id).collect();
        if doctor_ids.is_empty() {
            return Ok(Vec::new());
        }

        let doctor_code: u8 = Role::Doctor.into();
        let query = format!("id={}&role=eq.{}&order=id.asc", in_list(&doctor_ids), doctor_code);
        let doctors: Vec<User> = self.db.select("users", &query).await?;

        Ok(doctors.into_iter().map(DoctorListing::from).collect())
    }

    pub async fn appointments_for_doctor(
        &self,
        assistant: &AuthUser,
        doctor_id: i64,
    ) -> Result<Vec<Appointment>, AppError> {
        if !self.db.assistant_is_linked(doctor_id, assistant.id).await? {
            return Err(AppError::Unauthorized(
                "You are not assigned to this doctor.".to_string(),
            ));
        }

        self.appointments
            .for_doctor(doctor_id)
            .await
            .map_err(to_app_error)
    }
}
