use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use medical_record_cell::MedicalHistoryService;
use shared_config::AppConfig;
use shared_database::DbClient;
use shared_models::auth::{AuthUser, Role};
use shared_models::user::UserSummary;

use crate::models::{
    Appointment, AppointmentDetails, AppointmentError, CreateAppointmentRequest,
    UpdateAppointmentRequest,
};
use crate::policy::{can_cancel, can_update};

pub struct AppointmentService {
    db: DbClient,
    histories: MedicalHistoryService,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DbClient::new(config),
            histories: MedicalHistoryService::new(config),
        }
    }

    /// Books an appointment for the calling patient.
    pub async fn book(
        &self,
        patient: &AuthUser,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        if request.patient_id != patient.id {
            return Err(AppointmentError::PatientMismatch);
        }

        if self
            .db
            .find_user_with_role(request.doctor_id, Role::Doctor)
            .await?
            .is_none()
        {
            return Err(AppointmentError::InvalidDoctor);
        }

        self.histories.ensure_for_patient(request.patient_id).await?;

        let appointment: Appointment = self
            .db
            .insert(
                "appointments",
                json!({
                    "appointment_date": request.appointment_date.unwrap_or_else(Utc::now),
                    "doctor_id": request.doctor_id,
                    "patient_id": request.patient_id,
                    "notes": request.notes
                }),
            )
            .await?;

        info!(
            "Appointment {} booked: patient {} with doctor {}",
            appointment.id, appointment.patient_id, appointment.doctor_id
        );
        Ok(appointment)
    }

    pub async fn get(&self, appointment_id: i64) -> Result<AppointmentDetails, AppointmentError> {
        let appointment = self.find(appointment_id).await?;

        let participants = self
            .db
            .users_by_ids(&[appointment.doctor_id, appointment.patient_id])
            .await?;
        let summary_of = |id: i64| {
            participants
                .iter()
                .find(|user| user.id == id)
                .map(UserSummary::from)
        };

        Ok(AppointmentDetails {
            id: appointment.id,
            appointment_date: appointment.appointment_date,
            doctor: summary_of(appointment.doctor_id),
            patient: summary_of(appointment.patient_id),
            notes: appointment.notes,
        })
    }

    pub async fn update(
        &self,
        user: &AuthUser,
        appointment_id: i64,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.find(appointment_id).await?;
        let linked = self.linked_assistant(user, &appointment).await?;

        if !can_update(user, &appointment, linked) {
            return Err(match user.role {
                Role::Assistant => AppointmentError::UnlinkedAssistantUpdate,
                _ => AppointmentError::UpdateNotPermitted,
            });
        }

        let mut changes = Map::new();
        if let Some(date) = request.appointment_date {
            changes.insert("appointment_date".to_string(), json!(date));
        }
        if let Some(notes) = request.notes {
            changes.insert("notes".to_string(), json!(notes));
        }

        if changes.is_empty() {
            debug!("Appointment {} update carried no changes", appointment_id);
            return Ok(appointment);
        }

        let updated: Vec<Appointment> = self
            .db
            .update(
                "appointments",
                &format!("id=eq.{}", appointment_id),
                Value::Object(changes),
            )
            .await?;

        info!("Appointment {} updated by {} {}", appointment_id, user.role, user.id);
        updated.into_iter().next().ok_or(AppointmentError::NotFound)
    }

    pub async fn cancel(
        &self,
        user: &AuthUser,
        appointment_id: i64,
    ) -> Result<(), AppointmentError> {
        let appointment = self.find(appointment_id).await?;
        let linked = self.linked_assistant(user, &appointment).await?;

        if !can_cancel(user, &appointment, linked) {
            return Err(match user.role {
                Role::Assistant => AppointmentError::UnlinkedAssistantCancel,
                _ => AppointmentError::CancelNotPermitted,
            });
        }

        self.db
            .delete("appointments", &format!("id=eq.{}", appointment_id))
            .await?;

        info!("Appointment {} cancelled by {} {}", appointment_id, user.role, user.id);
        Ok(())
    }

    pub async fn for_doctor(&self, doctor_id: i64) -> Result<Vec<Appointment>, AppointmentError> {
        let query = format!("doctor_id=eq.{}&order=appointment_date.asc", doctor_id);
        Ok(self.db.select("appointments", &query).await?)
    }

    pub async fn for_patient(&self, patient_id: i64) -> Result<Vec<Appointment>, AppointmentError> {
        let query = format!("patient_id=eq.{}&order=appointment_date.asc", patient_id);
        Ok(self.db.select("appointments", &query).await?)
    }

    async fn find(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        self.db
            .select_one("appointments", &format!("id=eq.{}", appointment_id))
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    /// Only assistants need the link lookup.
    async fn linked_assistant(
        &self,
        user: &AuthUser,
        appointment: &Appointment,
    ) -> Result<bool, AppointmentError> {
        if !user.is(Role::Assistant) {
            return Ok(false);
        }
        Ok(self
            .db
            .assistant_is_linked(appointment.doctor_id, user.id)
            .await?)
    }
}
