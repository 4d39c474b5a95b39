use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::error::ValidationErrors;
use shared_utils::validation;

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;
pub const REVIEW_TEXT_MAX: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct DoctorReview {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub rating: i64,
    pub review_text: String,
    pub review_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: i64,
    pub rating: i64,
    pub review_text: String,
    pub patient_id: i64,
    pub patient_name: String,
    pub review_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateReviewRequest {
    pub rating: i64,
    pub review_text: String,
}

impl CreateReviewRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validation::range(&mut errors, "Rating", self.rating, RATING_MIN, RATING_MAX);
        validation::required(&mut errors, "ReviewText", &self.review_text);
        validation::max_length(&mut errors, "ReviewText", &self.review_text, REVIEW_TEXT_MAX);
        errors
    }
}

/// Aggregate rating for one doctor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReviewSummary {
    pub doctor_id: i64,
    pub review_count: usize,
    pub average_rating: f64,
}

impl ReviewSummary {
    /// Average rounded to two decimals; zero without reviews.
    pub fn from_ratings(doctor_id: i64, ratings: &[i64]) -> Self {
        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            let total: i64 = ratings.iter().sum();
            let raw = total as f64 / ratings.len() as f64;
            (raw * 100.0).round() / 100.0
        };

        Self {
            doctor_id,
            review_count: ratings.len(),
            average_rating,
        }
    }
}
