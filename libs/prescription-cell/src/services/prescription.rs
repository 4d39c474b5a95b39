use std::collections::HashMap;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::{in_list, DbClient};
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;
use shared_utils::extractor::ensure_owner;

use crate::models::{
    CreatePrescriptionRequest, Medication, MedicationDto, Prescription, PrescriptionDto,
    PrescriptionStatus, UpdatePrescriptionRequest,
};

pub struct PrescriptionService {
    db: DbClient,
}

impl PrescriptionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DbClient::new(config),
        }
    }

    pub async fn create(
        &self,
        doctor: &AuthUser,
        request: CreatePrescriptionRequest,
    ) -> Result<Prescription, AppError> {
        request.validate().into_result()?;

        if self
            .db
            .find_user_with_role(request.patient_id, Role::Patient)
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest("Invalid patient ID.".to_string()));
        }

        let prescription: Prescription = self
            .db
            .insert(
                "prescriptions",
                json!({
                    "patient_id": request.patient_id,
                    "doctor_id": doctor.id,
                    "appointment_id": request.appointment_id,
                    "date": request.date.unwrap_or_else(Utc::now),
                    "description": request.description,
                    "status": PrescriptionStatus::Active
                }),
            )
            .await?;

        info!(
            "Doctor {} prescribed {} for patient {}",
            doctor.id, prescription.id, prescription.patient_id
        );
        Ok(prescription)
    }

    pub async fn get(&self, prescription_id: i64) -> Result<PrescriptionDto, AppError> {
        let prescription = self.find(prescription_id).await?;
        let mut dtos = self.to_dtos(vec![prescription]).await?;
        dtos.pop()
            .ok_or_else(|| AppError::NotFound("Prescription not found.".to_string()))
    }

    pub async fn for_patient(
        &self,
        caller: &AuthUser,
        patient_id: i64,
    ) -> Result<Vec<PrescriptionDto>, AppError> {
        if caller.is(Role::Patient) {
            ensure_owner(caller, patient_id, "You can only view your own prescriptions.")?;
        }

        let query = format!("patient_id=eq.{}&order=date.desc", patient_id);
        let prescriptions: Vec<Prescription> = self.db.select("prescriptions", &query).await?;
        self.to_dtos(prescriptions).await
    }

    pub async fn for_appointment(
        &self,
        appointment_id: i64,
    ) -> Result<Vec<PrescriptionDto>, AppError> {
        let query = format!("appointment_id=eq.{}&order=date.desc", appointment_id);
        let prescriptions: Vec<Prescription> = self.db.select("prescriptions", &query).await?;
        self.to_dtos(prescriptions).await
    }

    pub async fn update(
        &self,
        doctor: &AuthUser,
        prescription_id: i64,
        request: UpdatePrescriptionRequest,
    ) -> Result<(), AppError> {
        let prescription = self.find(prescription_id).await?;
        ensure_owner(
            doctor,
            prescription.doctor_id,
            "You are not authorized to update this prescription.",
        )?;

        let changes = request.changes();
        if changes.is_empty() {
            return Ok(());
        }

        let _: Vec<Prescription> = self
            .db
            .update(
                "prescriptions",
                &format!("id=eq.{}", prescription_id),
                Value::Object(changes),
            )
            .await?;

        info!("Prescription {} updated by doctor {}", prescription_id, doctor.id);
        Ok(())
    }

    /// Removes the prescription and its medications.
    pub async fn delete(&self, doctor: &AuthUser, prescription_id: i64) -> Result<(), AppError> {
        let prescription = self.find(prescription_id).await?;
        ensure_owner(
            doctor,
            prescription.doctor_id,
            "You are not authorized to delete this prescription.",
        )?;

        self.db
            .delete("medications", &format!("prescription_id=eq.{}", prescription_id))
            .await?;
        self.db
            .delete("prescriptions", &format!("id=eq.{}", prescription_id))
            .await?;

        info!("Prescription {} deleted by doctor {}", prescription_id, doctor.id);
        Ok(())
    }

    pub async fn find(&self, prescription_id: i64) -> Result<Prescription, AppError> {
        self.db
            .select_one("prescriptions", &format!("id=eq.{}", prescription_id))
            .await?
            .ok_or_else(|| AppError::NotFound("Prescription not found.".to_string()))
    }

    /// Attaches medications and participant names with one lookup per table.
    async fn to_dtos(
        &self,
        prescriptions: Vec<Prescription>,
    ) -> Result<Vec<PrescriptionDto>, AppError> {
        if prescriptions.is_empty() {
            return Ok(Vec::new());
        }

        let prescription_ids: Vec<i64> = prescriptions.iter().map(|p| p.id).collect();
        let mut user_ids: Vec<i64> = prescriptions
            .iter()
            .flat_map(|p| [p.doctor_id, p.patient_id])
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let medications_query =
            format!("prescription_id={}&order=id.asc", in_list(&prescription_ids));
        let (medications, users) = futures::try_join!(
            self.db.select::<Medication>("medications", &medications_query),
            self.db.users_by_ids(&user_ids),
        )?;

        debug!(
            "Loaded {} medications for {} prescriptions",
            medications.len(),
            prescriptions.len()
        );

        let names: HashMap<i64, String> = users.iter().map(|u| (u.id, u.full_name())).collect();
        let mut by_prescription: HashMap<i64, Vec<MedicationDto>> = HashMap::new();
        for medication in medications {
            by_prescription
                .entry(medication.prescription_id)
                .or_default()
                .push(MedicationDto::from(medication));
        }

        let name_of = |id: i64| names.get(&id).cloned().unwrap_or_default();

        Ok(prescriptions
            .into_iter()
            .map(|p| PrescriptionDto {
                id: p.id,
                patient_id: p.patient_id,
                doctor_id: p.doctor_id,
                doctor_name: name_of(p.doctor_id),
                patient_name: name_of(p.patient_id),
                description: p.description,
                date: p.date,
                status: p.status,
                appointment_id: p.appointment_id,
                medications: by_prescription.remove(&p.id).unwrap_or_default(),
            })
            .collect())
    }
}
