use std::collections::HashMap;

use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::{in_list, DbClient};
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_models::user::User;

use crate::models::{Office, OfficeDoctor, OfficeDto, OfficeRequest};

pub struct OfficeService {
    db: DbClient,
}

impl OfficeService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DbClient::new(config),
        }
    }

    pub async fn list(&self) -> Result<Vec<OfficeDto>, AppError> {
        let offices: Vec<Office> = self.db.select("offices", "order=id.asc").await?;
        if offices.is_empty() {
            return Ok(Vec::new());
        }

        let office_ids: Vec<i64> = offices.iter().map(|o| o.id).collect();
        let doctor_code: u8 = Role::Doctor.into();
        let query = format!(
            "office_id={}&role=eq.{}&select=id,office_id",
            in_list(&office_ids),
            doctor_code
        );
        let links: Vec<Value> = self.db.select("users", &query).await?;

        let mut doctors_by_office: HashMap<i64, Vec<i64>> = HashMap::new();
        for link in links {
            if let (Some(id), Some(office_id)) = (link["id"].as_i64(), link["office_id"].as_i64()) {
                doctors_by_office.entry(office_id).or_default().push(id);
            }
        }

        Ok(offices
            .into_iter()
            .map(|office| {
                let doctor_ids = doctors_by_office.remove(&office.id).unwrap_or_default();
                OfficeDto::new(office, doctor_ids)
            })
            .collect())
    }

    pub async fn get(&self, office_id: i64) -> Result<OfficeDto, AppError> {
        let (office, doctors) = futures::try_join!(self.find(office_id), self.doctors(office_id))?;
        let doctor_ids = doctors.iter().map(|d| d.id).collect();
        Ok(OfficeDto::new(office, doctor_ids))
    }

    pub async fn doctors(&self, office_id: i64) -> Result<Vec<OfficeDoctor>, AppError> {
        let doctor_code: u8 = Role::Doctor.into();
        let query = format!("office_id=eq.{}&role=eq.{}&order=id.asc", office_id, doctor_code);
        let doctors: Vec<User> = self.db.select("users", &query).await?;
        Ok(doctors.into_iter().map(OfficeDoctor::from).collect())
    }

    pub async fn create(&self, request: OfficeRequest) -> Result<Office, AppError> {
        request.validate().into_result()?;

        let office: Office = self.db.insert("offices", office_columns(&request)).await?;

        info!("Office {} created", office.id);
        Ok(office)
    }

    pub async fn update(&self, office_id: i64, request: OfficeRequest) -> Result<(), AppError> {
        request.validate().into_result()?;
        self.find(office_id).await?;

        let _: Vec<Office> = self
            .db
            .update("offices", &format!("id=eq.{}", office_id), office_columns(&request))
            .await?;

        Ok(())
    }

    /// Detaches the office's users before removing the row.
    pub async fn delete(&self, office_id: i64) -> Result<(), AppError> {
        self.find(office_id).await?;

        let _: Vec<User> = self
            .db
            .update(
                "users",
                &format!("office_id=eq.{}", office_id),
                json!({ "office_id": null }),
            )
            .await?;
        self.db
            .delete("offices", &format!("id=eq.{}", office_id))
            .await?;

        info!("Office {} deleted", office_id);
        Ok(())
    }

    pub async fn assign_doctor(&self, office_id: i64, doctor_id: i64) -> Result<(), AppError> {
        self.find(office_id).await?;
        self.find_doctor(doctor_id).await?;

        self.set_office(doctor_id, Some(office_id)).await?;

        info!("Doctor {} assigned to office {}", doctor_id, office_id);
        Ok(())
    }

    pub async fn unassign_doctor(&self, office_id: i64, doctor_id: i64) -> Result<(), AppError> {
        self.find(office_id).await?;
        let doctor = self.find_doctor(doctor_id).await?;

        if doctor.office_id != Some(office_id) {
            return Err(AppError::BadRequest(
                "Doctor is not assigned to this office.".to_string(),
            ));
        }

        self.set_office(doctor_id, None).await?;

        info!("Doctor {} removed from office {}", doctor_id, office_id);
        Ok(())
    }

    async fn find(&self, office_id: i64) -> Result<Office, AppError> {
        self.db
            .select_one("offices", &format!("id=eq.{}", office_id))
            .await?
            .ok_or_else(|| AppError::NotFound("Office not found.".to_string()))
    }

    async fn find_doctor(&self, doctor_id: i64) -> Result<User, AppError> {
        self.db
            .find_user_with_role(doctor_id, Role::Doctor)
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor not found.".to_string()))
    }

    async fn set_office(&self, doctor_id: i64, office_id: Option<i64>) -> Result<(), AppError> {
        debug!("Setting office of doctor {} to {:?}", doctor_id, office_id);
        let _: Vec<User> = self
            .db
            .update(
                "users",
                &format!("id=eq.{}", doctor_id),
                json!({ "office_id": office_id }),
            )
            .await?;
        Ok(())
    }
}

fn office_columns(request: &OfficeRequest) -> Value {
    json!({
        "name": request.name,
        "address": request.address.trim(),
        "city": request.city,
        "state": request.state,
        "zip_code": request.zip_code
    })
}
