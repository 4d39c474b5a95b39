use chrono::Utc;
use serde_json::json;
use tracing::info;

use shared_config::AppConfig;
use shared_database::DbClient;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;

use crate::models::{CreateDiagnosticRequest, PatientDiagnostic};
use crate::services::MedicalHistoryService;

pub struct DiagnosticService {
    db: DbClient,
    histories: MedicalHistoryService,
}

impl DiagnosticService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DbClient::new(config),
            histories: MedicalHistoryService::new(config),
        }
    }

    /// Records a diagnosis by the calling doctor.
    pub async fn create(
        &self,
        doctor: &AuthUser,
        request: CreateDiagnosticRequest,
    ) -> Result<PatientDiagnostic, AppError> {
        let template_query = format!("id=eq.{}", request.diagnostic_template_id);
        if !self.db.exists("diagnostic_templates", &template_query).await? {
            return Err(AppError::BadRequest("Invalid diagnostic template.".to_string()));
        }

        if self
            .db
            .find_user_with_role(request.patient_id, Role::Patient)
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest("Invalid patient ID.".to_string()));
        }

        self.histories.ensure_for_patient(request.patient_id).await?;

        let diagnostic: PatientDiagnostic = self
            .db
            .insert(
                "patient_diagnostics",
                json!({
                    "patient_id": request.patient_id,
                    "doctor_id": doctor.id,
                    "diagnostic_template_id": request.diagnostic_template_id,
                    "date_diagnosed": request.date_diagnosed.unwrap_or_else(Utc::now),
                    "notes": request.notes
                }),
            )
            .await?;

        info!(
            "Doctor {} recorded diagnostic {} for patient {}",
            doctor.id, diagnostic.id, diagnostic.patient_id
        );
        Ok(diagnostic)
    }

    pub async fn for_patient(&self, patient_id: i64) -> Result<Vec<PatientDiagnostic>, AppError> {
        let query = format!("patient_id=eq.{}&order=date_diagnosed.asc", patient_id);
        Ok(self.db.select("patient_diagnostics", &query).await?)
    }
}
