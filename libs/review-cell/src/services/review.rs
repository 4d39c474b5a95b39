use std::collections::HashMap;

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use shared_config::AppConfig;
use shared_database::DbClient;
use shared_models::auth::{AuthUser, Role};
use shared_models::error::AppError;

use crate::models::{CreateReviewRequest, DoctorReview, ReviewDto, ReviewSummary};

#[derive(Deserialize)]
struct RatingRow {
    rating: i64,
}

pub struct ReviewService {
    db: DbClient,
}

impl ReviewService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DbClient::new(config),
        }
    }

    /// Patient id always comes from the token.
    pub async fn submit(
        &self,
        patient: &AuthUser,
        doctor_id: i64,
        request: CreateReviewRequest,
    ) -> Result<DoctorReview, AppError> {
        request.validate().into_result()?;
        self.ensure_doctor(doctor_id).await?;

        let review: DoctorReview = self
            .db
            .insert(
                "doctor_reviews",
                json!({
                    "doctor_id": doctor_id,
                    "patient_id": patient.id,
                    "rating": request.rating,
                    "review_text": request.review_text,
                    "review_date": Utc::now()
                }),
            )
            .await?;

        info!("Patient {} reviewed doctor {} ({} stars)", patient.id, doctor_id, review.rating);
        Ok(review)
    }

    pub async fn for_doctor(&self, doctor_id: i64) -> Result<Vec<ReviewDto>, AppError> {
        let query = format!("doctor_id=eq.{}&order=review_date.desc", doctor_id);
        let reviews: Vec<DoctorReview> = self.db.select("doctor_reviews", &query).await?;

        let mut patient_ids: Vec<i64> = reviews.iter().map(|r| r.patient_id).collect();
        patient_ids.sort_unstable();
        patient_ids.dedup();

        let names: HashMap<i64, String> = self
            .db
            .users_by_ids(&patient_ids)
            .await?
            .iter()
            .map(|u| (u.id, u.full_name()))
            .collect();

        Ok(reviews
            .into_iter()
            .map(|r| ReviewDto {
                id: r.id,
                rating: r.rating,
                patient_name: names.get(&r.patient_id).cloned().unwrap_or_default(),
                patient_id: r.patient_id,
                review_text: r.review_text,
                review_date: r.review_date,
            })
            .collect())
    }

    pub async fn summary(&self, doctor_id: i64) -> Result<ReviewSummary, AppError> {
        self.ensure_doctor(doctor_id).await?;

        let query = format!("doctor_id=eq.{}&select=rating", doctor_id);
        let rows: Vec<RatingRow> = self.db.select("doctor_reviews", &query).await?;
        let ratings: Vec<i64> = rows.into_iter().map(|row| row.rating).collect();

        Ok(ReviewSummary::from_ratings(doctor_id, &ratings))
    }

    async fn ensure_doctor(&self, doctor_id: i64) -> Result<(), AppError> {
        match self.db.find_user_with_role(doctor_id, Role::Doctor).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Doctor not found.".to_string())),
        }
    }
}
