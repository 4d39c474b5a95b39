use serde_json::json;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::DbClient;
use shared_models::auth::Role;
use shared_models::error::AppError;

use crate::models::{HistoryAppointment, MedicalHistory, MedicalHistoryView, PatientDiagnostic};

pub struct MedicalHistoryService {
    db: DbClient,
}

impl MedicalHistoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DbClient::new(config),
        }
    }

    pub async fn find_by_patient(
        &self,
        patient_id: i64,
    ) -> Result<Option<MedicalHistory>, AppError> {
        let history = self
            .db
            .select_one("medical_histories", &format!("patient_id=eq.{}", patient_id))
            .await?;
        Ok(history)
    }

    /// Returns the patient's history id, creating the row on first use.
    pub async fn ensure_for_patient(&self, patient_id: i64) -> Result<i64, AppError> {
        if let Some(history) = self.find_by_patient(patient_id).await? {
            return Ok(history.id);
        }

        let inserted: Result<MedicalHistory, _> = self
            .db
            .insert("medical_histories", json!({ "patient_id": patient_id }))
            .await;

        match inserted {
            Ok(history) => {
                debug!("Created medical history {} for patient {}", history.id, patient_id);
                Ok(history.id)
            }
            Err(e) => {
                // A concurrent request may have created it first.
                warn!("Medical history insert for patient {} failed: {}", patient_id, e);
                self.find_by_patient(patient_id)
                    .await?
                    .map(|history| history.id)
                    .ok_or_else(|| AppError::from(e))
            }
        }
    }

    pub async fn create(&self, patient_id: i64) -> Result<MedicalHistory, AppError> {
        if self.db.find_user_with_role(patient_id, Role::Patient).await?.is_none() {
            return Err(AppError::NotFound("Patient not found.".to_string()));
        }

        if self.find_by_patient(patient_id).await?.is_some() {
            return Err(AppError::BadRequest(
                "Medical history already exists for this patient.".to_string(),
            ));
        }

        let history: MedicalHistory = self
            .db
            .insert("medical_histories", json!({ "patient_id": patient_id }))
            .await?;

        info!("Medical history {} created for patient {}", history.id, patient_id);
        Ok(history)
    }

    /// History id for the patient, or 0 when none exists.
    pub async fn verify(&self, patient_id: i64) -> Result<i64, AppError> {
        Ok(self
            .find_by_patient(patient_id)
            .await?
            .map(|history| history.id)
            .unwrap_or(0))
    }

    /// The history together with the patient's appointments and diagnostics.
    pub async fn aggregate(&self, patient_id: i64) -> Result<MedicalHistoryView, AppError> {
        let history = self
            .find_by_patient(patient_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Medical history not found for this patient.".to_string())
            })?;

        let appointments_query = format!(
            "patient_id=eq.{}&select=id,appointment_date,doctor_id,notes&order=appointment_date.asc",
            patient_id
        );
        let diagnostics_query = format!("patient_id=eq.{}&order=date_diagnosed.asc", patient_id);

        let (appointments, patient_diagnostics) = futures::try_join!(
            self.db.select::<HistoryAppointment>("appointments", &appointments_query),
            self.db.select::<PatientDiagnostic>("patient_diagnostics", &diagnostics_query),
        )?;

        Ok(MedicalHistoryView {
            id: history.id,
            patient_id: history.patient_id,
            appointments,
            patient_diagnostics,
        })
    }

    pub async fn delete(&self, patient_id: i64) -> Result<(), AppError> {
        let history = self
            .find_by_patient(patient_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Medical history not found.".to_string()))?;

        self.db
            .delete("medical_histories", &format!("id=eq.{}", history.id))
            .await?;

        info!("Medical history {} deleted", history.id);
        Ok(())
    }
}
