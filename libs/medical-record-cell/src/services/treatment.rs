use serde_json::{json, Map, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::DbClient;
use shared_models::error::AppError;

use crate::models::{CreateTreatmentRequest, Treatment, UpdateTreatmentRequest};

pub struct TreatmentService {
    db: DbClient,
}

impl TreatmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DbClient::new(config),
        }
    }

    pub async fn for_diagnostic(
        &self,
        patient_diagnostic_id: i64,
    ) -> Result<Vec<Treatment>, AppError> {
        let query = format!(
            "patient_diagnostic_id=eq.{}&order=start_date.asc",
            patient_diagnostic_id
        );
        Ok(self.db.select("treatments", &query).await?)
    }

    pub async fn create(&self, request: CreateTreatmentRequest) -> Result<Treatment, AppError> {
        request.validate().into_result()?;

        let diagnostic_query = format!("id=eq.{}", request.patient_diagnostic_id);
        if !self.db.exists("patient_diagnostics", &diagnostic_query).await? {
            return Err(AppError::BadRequest("Invalid patient diagnostic ID.".to_string()));
        }

        let treatment: Treatment = self
            .db
            .insert(
                "treatments",
                json!({
                    "name": request.name.trim(),
                    "description": request.description,
                    "patient_diagnostic_id": request.patient_diagnostic_id,
                    "start_date": request.start_date,
                    "end_date": request.end_date
                }),
            )
            .await?;

        info!(
            "Treatment {} added to diagnostic {}",
            treatment.id, treatment.patient_diagnostic_id
        );
        Ok(treatment)
    }

    pub async fn update(
        &self,
        treatment_id: i64,
        request: UpdateTreatmentRequest,
    ) -> Result<(), AppError> {
        request.validate().into_result()?;
        self.find(treatment_id).await?;

        let changes = treatment_changes(&request);
        if changes.is_empty() {
            debug!("Treatment {} update carried no changes", treatment_id);
            return Ok(());
        }

        let _: Vec<Treatment> = self
            .db
            .update("treatments", &format!("id=eq.{}", treatment_id), Value::Object(changes))
            .await?;

        Ok(())
    }

    pub async fn delete(&self, treatment_id: i64) -> Result<(), AppError> {
        self.find(treatment_id).await?;
        self.db
            .delete("treatments", &format!("id=eq.{}", treatment_id))
            .await?;

        info!("Treatment {} deleted", treatment_id);
        Ok(())
    }

    async fn find(&self, treatment_id: i64) -> Result<Treatment, AppError> {
        self.db
            .select_one("treatments", &format!("id=eq.{}", treatment_id))
            .await?
            .ok_or_else(|| AppError::NotFound("Treatment not found.".to_string()))
    }
}

/// Columns to patch. Blank strings count as "not provided".
pub fn treatment_changes(request: &UpdateTreatmentRequest) -> Map<String, Value> {
    let mut changes = Map::new();

    if let Some(name) = request.name.as_deref().filter(|s| !s.trim().is_empty()) {
        changes.insert("name".to_string(), json!(name.trim()));
    }
    if let Some(description) = request.description.as_deref().filter(|s| !s.trim().is_empty()) {
        changes.insert("description".to_string(), json!(description));
    }
    if let Some(start) = request.start_date {
        changes.insert("start_date".to_string(), json!(start));
    }
    if let Some(end) = request.end_date {
        changes.insert("end_date".to_string(), json!(end));
    }

    changes
}
