use serde_json::{json, Value};
use tracing::info;

use shared_config::AppConfig;
use shared_database::DbClient;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::extractor::ensure_owner;

use crate::models::{Medication, MedicationRequest, UpdateMedicationRequest};
use crate::services::PrescriptionService;

const MODIFY_DENIED: &str = "You are not authorized to modify this prescription.";

/// Medication lines. Only the doctor owning the parent prescription may
/// change them.
pub struct MedicationService {
    db: DbClient,
    prescriptions: PrescriptionService,
}

impl MedicationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DbClient::new(config),
            prescriptions: PrescriptionService::new(config),
        }
    }

    pub async fn add(
        &self,
        doctor: &AuthUser,
        prescription_id: i64,
        request: MedicationRequest,
    ) -> Result<Medication, AppError> {
        request.validate().into_result()?;

        let prescription = self.prescriptions.find(prescription_id).await?;
        ensure_owner(doctor, prescription.doctor_id, MODIFY_DENIED)?;

        let medication: Medication = self
            .db
            .insert(
                "medications",
                json!({
                    "prescription_id": prescription_id,
                    "name": request.name,
                    "dosage": request.dosage,
                    "frequency": request.frequency,
                    "notes": request.notes
                }),
            )
            .await?;

        info!("Medication {} added to prescription {}", medication.id, prescription_id);
        Ok(medication)
    }

    pub async fn update(
        &self,
        doctor: &AuthUser,
        medication_id: i64,
        request: UpdateMedicationRequest,
    ) -> Result<(), AppError> {
        self.authorize(doctor, medication_id).await?;

        let changes = request.changes();
        if changes.is_empty() {
            return Ok(());
        }

        let _: Vec<Medication> = self
            .db
            .update(
                "medications",
                &format!("id=eq.{}", medication_id),
                Value::Object(changes),
            )
            .await?;

        Ok(())
    }

    pub async fn delete(&self, doctor: &AuthUser, medication_id: i64) -> Result<(), AppError> {
        self.authorize(doctor, medication_id).await?;

        self.db
            .delete("medications", &format!("id=eq.{}", medication_id))
            .await?;

        info!("Medication {} deleted by doctor {}", medication_id, doctor.id);
        Ok(())
    }

    async fn authorize(
        &self,
        doctor: &AuthUser,
        medication_id: i64,
    ) -> Result<Medication, AppError> {
        let medication: Medication = self
            .db
            .select_one("medications", &format!("id=eq.{}", medication_id))
            .await?
            .ok_or_else(|| AppError::NotFound("Medication not found.".to_string()))?;

        let prescription = self.prescriptions.find(medication.prescription_id).await?;
        ensure_owner(doctor, prescription.doctor_id, MODIFY_DENIED)?;

        Ok(medication)
    }
}
