use tracing::debug;

use appointment_cell::handlers::to_app_error;
use appointment_cell::AppointmentService;
use shared_config::AppConfig;
use shared_database::DbClient;
use shared_models::auth::Role;
use shared_models::error::AppError;

use crate::models::{DoctorListing, PatientContact};

pub struct DoctorService {
    db: DbClient,
    appointments: AppointmentService,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DbClient::new(config),
            appointments: AppointmentService::new(config),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<DoctorListing>, AppError> {
        let doctors = self.db.users_with_role(Role::Doctor).await?;
        Ok(doctors.into_iter().map(DoctorListing::from).collect())
    }

    pub async fn get_doctor(&self, doctor_id: i64) -> Result<DoctorListing, AppError> {
        self.db
            .find_user_with_role(doctor_id, Role::Doctor)
            .await?
            .map(DoctorListing::from)
            .ok_or_else(|| AppError::NotFound("Doctor not found.".to_string()))
    }

    /// Distinct patients that have at least one appointment with the doctor.
    pub async fn patients_of(&self, doctor_id: i64) -> Result<Vec<PatientContact>, AppError> {
        let appointments = self
            .appointments
            .for_doctor(doctor_id)
            .await
            .map_err(to_app_error)?;

        let mut patient_ids: Vec<i64> = appointments.iter().map(|a| a.patient_id).collect();
        patient_ids.sort_unstable();
        patient_ids.dedup();

        debug!("Doctor {} has {} distinct patients", doctor_id, patient_ids.len());

        let patients = self.db.users_by_ids(&patient_ids).await?;
        Ok(patients.into_iter().map(PatientContact::from).collect())
    }
}
