use serde_json::json;
use tracing::info;

use shared_config::AppConfig;
use shared_database::DbClient;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::extractor::ensure_owner;

use crate::models::{DoctorSchedule, ScheduleRequest};

/// Working-hour blocks a doctor publishes for themselves.
pub struct ScheduleService {
    db: DbClient,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DbClient::new(config),
        }
    }

    pub async fn list_own(&self, doctor: &AuthUser) -> Result<Vec<DoctorSchedule>, AppError> {
        let query = format!("doctor_id=eq.{}&order=start_time.asc", doctor.id);
        Ok(self.db.select("doctor_schedules", &query).await?)
    }

    pub async fn create(
        &self,
        doctor: &AuthUser,
        request: ScheduleRequest,
    ) -> Result<DoctorSchedule, AppError> {
        request.validate().into_result()?;

        let schedule: DoctorSchedule = self
            .db
            .insert(
                "doctor_schedules",
                json!({
                    "doctor_id": doctor.id,
                    "start_time": request.start_time,
                    "end_time": request.end_time,
                    "description": request.description
                }),
            )
            .await?;

        info!("Doctor {} added schedule {}", doctor.id, schedule.id);
        Ok(schedule)
    }

    pub async fn update(
        &self,
        doctor: &AuthUser,
        schedule_id: i64,
        request: ScheduleRequest,
    ) -> Result<(), AppError> {
        request.validate().into_result()?;

        let schedule = self.find(schedule_id).await?;
        ensure_owner(
            doctor,
            schedule.doctor_id,
            "You are not authorized to update this schedule.",
        )?;

        let _: Vec<DoctorSchedule> = self
            .db
            .update(
                "doctor_schedules",
                &format!("id=eq.{}", schedule_id),
                json!({
                    "start_time": request.start_time,
                    "end_time": request.end_time,
                    "description": request.description
                }),
            )
            .await?;

        Ok(())
    }

    pub async fn delete(&self, doctor: &AuthUser, schedule_id: i64) -> Result<(), AppError> {
        let schedule = self.find(schedule_id).await?;
        ensure_owner(
            doctor,
            schedule.doctor_id,
            "You are not authorized to delete this schedule.",
        )?;

        self.db
            .delete("doctor_schedules", &format!("id=eq.{}", schedule_id))
            .await?;

        info!("Doctor {} removed schedule {}", doctor.id, schedule_id);
        Ok(())
    }

    async fn find(&self, schedule_id: i64) -> Result<DoctorSchedule, AppError> {
        self.db
            .select_one("doctor_schedules", &format!("id=eq.{}", schedule_id))
            .await?
            .ok_or_else(|| AppError::NotFound("Schedule not found.".to_string()))
    }
}
