use std::collections::HashMap;

use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::DbClient;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::extractor::ensure_owner;

use crate::models::{DiagnosticTemplate, DiagnosticTemplateView, TemplateRequest};

pub struct TemplateService {
    db: DbClient,
}

impl TemplateService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DbClient::new(config),
        }
    }

    pub async fn list(&self) -> Result<Vec<DiagnosticTemplateView>, AppError> {
        let templates: Vec<DiagnosticTemplate> =
            self.db.select("diagnostic_templates", "order=id.asc").await?;
        self.with_creator_names(templates).await
    }

    pub async fn get(&self, template_id: i64) -> Result<DiagnosticTemplateView, AppError> {
        let template = self.find(template_id).await?;
        let mut views = self.with_creator_names(vec![template]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::NotFound("Diagnostic template not found.".to_string()))
    }

    pub async fn create(
        &self,
        doctor: &AuthUser,
        request: TemplateRequest,
    ) -> Result<DiagnosticTemplate, AppError> {
        request.validate().into_result()?;

        let template: DiagnosticTemplate = self
            .db
            .insert(
                "diagnostic_templates",
                json!({
                    "name": request.name.trim(),
                    "description": request.description,
                    "created_by_doctor_id": doctor.id
                }),
            )
            .await?;

        info!("Doctor {} created diagnostic template {}", doctor.id, template.id);
        Ok(template)
    }

    pub async fn update(
        &self,
        doctor: &AuthUser,
        template_id: i64,
        request: TemplateRequest,
    ) -> Result<(), AppError> {
        request.validate().into_result()?;

        let template = self.find(template_id).await?;
        ensure_owner(
            doctor,
            template.created_by_doctor_id,
            "You are not authorized to update this template.",
        )?;

        let _: Vec<DiagnosticTemplate> = self
            .db
            .update(
                "diagnostic_templates",
                &format!("id=eq.{}", template_id),
                json!({
                    "name": request.name.trim(),
                    "description": request.description
                }),
            )
            .await?;

        debug!("Diagnostic template {} updated", template_id);
        Ok(())
    }

    pub async fn delete(&self, doctor: &AuthUser, template_id: i64) -> Result<(), AppError> {
        let template = self.find(template_id).await?;
        ensure_owner(
            doctor,
            template.created_by_doctor_id,
            "You are not authorized to delete this template.",
        )?;

        self.db
            .delete("diagnostic_templates", &format!("id=eq.{}", template_id))
            .await?;

        info!("Diagnostic template {} deleted by doctor {}", template_id, doctor.id);
        Ok(())
    }

    async fn find(&self, template_id: i64) -> Result<DiagnosticTemplate, AppError> {
        self.db
            .select_one("diagnostic_templates", &format!("id=eq.{}", template_id))
            .await?
            .ok_or_else(|| AppError::NotFound("Diagnostic template not found.".to_string()))
    }

    async fn with_creator_names(
        &self,
        templates: Vec<DiagnosticTemplate>,
    ) -> Result<Vec<DiagnosticTemplateView>, AppError> {
        let mut creator_ids: Vec<i64> = templates.iter().map(|t| t.created_by_doctor_id).collect();
        creator_ids.sort_unstable();
        creator_ids.dedup();

        let names: HashMap<i64, String> = self
            .db
            .users_by_ids(&creator_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.full_name()))
            .collect();

        Ok(templates
            .into_iter()
            .map(|template| DiagnosticTemplateView {
                created_by_doctor_name: names.get(&template.created_by_doctor_id).cloned(),
                id: template.id,
                name: template.name,
                description: template.description,
                created_by_doctor_id: template.created_by_doctor_id,
            })
            .collect())
    }
}
