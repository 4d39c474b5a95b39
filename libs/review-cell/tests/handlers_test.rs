use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Extension, Json, State};
use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use review_cell::handlers::*;
use review_cell::models::CreateReviewRequest;
use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::extractor::{AppJson, AppPath};
use shared_utils::test_utils::{MockDbResponses, TestConfig, TestUser};

fn config_for(server: &MockServer) -> Arc<AppConfig> {
    TestConfig::with_database_url(&server.uri()).to_arc()
}

fn review_row(id: i64, doctor_id: i64, patient_id: i64, rating: i64) -> serde_json::Value {
    json!({
        "id": id,
        "doctor_id": doctor_id,
        "patient_id": patient_id,
        "rating": rating,
        "review_text": "Very thorough.",
        "review_date": "2025-03-10T10:00:00Z"
    })
}

async fn mount_doctor(server: &MockServer, doctor_id: i64) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .and(query_param("role", "eq.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::user_row(doctor_id, Role::Doctor, "Lisa", "Cuddy")
        ])))
        .mount(server)
        .await;
}

fn review(rating: i64, text: &str) -> CreateReviewRequest {
    CreateReviewRequest {
        rating,
        review_text: text.to_string(),
    }
}

#[tokio::test]
async fn test_review_out_of_range_returns_validation_dictionary() {
    let mock_server = MockServer::start().await;

    let caller = TestUser::patient(20).to_auth_user();
    let result = submit_review(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath(1),
        AppJson(review(6, "")),
    )
    .await;

    assert_matches!(
        result,
        Err(AppError::Validation(errors))
            if errors.contains("Rating") && errors.contains("ReviewText")
    );
}

#[tokio::test]
async fn test_review_for_unknown_doctor_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let caller = TestUser::patient(20).to_auth_user();
    let result = submit_review(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath(99),
        AppJson(review(4, "Great")),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(msg)) if msg == "Doctor not found.");
}

#[tokio::test]
async fn test_review_patient_comes_from_token() {
    let mock_server = MockServer::start().await;

    mount_doctor(&mock_server, 1).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/doctor_reviews"))
        .and(body_partial_json(json!({ "doctor_id": 1, "patient_id": 20, "rating": 5 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([review_row(3, 1, 20, 5)])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let caller = TestUser::patient(20).to_auth_user();
    let (status, _, Json(body)) = submit_review(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath(1),
        AppJson(review(5, "Very thorough.")),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["Message"], "Review submitted successfully.");
}

#[tokio::test]
async fn test_doctor_cannot_submit_review() {
    let mock_server = MockServer::start().await;

    let caller = TestUser::doctor(2).to_auth_user();
    let result = submit_review(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath(1),
        AppJson(review(5, "Self promotion")),
    )
    .await;

    assert_matches!(result, Err(AppError::Forbidden));
}

#[tokio::test]
async fn test_reviews_carry_patient_names() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_reviews"))
        .and(query_param("doctor_id", "eq.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            review_row(3, 1, 20, 5),
            review_row(4, 1, 20, 3)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", "in.(20)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::user_row(20, Role::Patient, "Pat", "Smith")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let Json(reviews) = get_reviews(State(config_for(&mock_server)), AppPath(1)).await.unwrap();

    assert_eq!(reviews.len(), 2);
    assert!(reviews.iter().all(|r| r.patient_name == "Pat Smith"));
}

#[tokio::test]
async fn test_summary_averages_ratings() {
    let mock_server = MockServer::start().await;

    mount_doctor(&mock_server, 1).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctor_reviews"))
        .and(query_param("select", "rating"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "rating": 5 },
            { "rating": 4 },
            { "rating": 3 }
        ])))
        .mount(&mock_server)
        .await;

    let Json(summary) = get_review_summary(
        State(config_for(&mock_server)),
        AppPath(1),
    )
    .await
    .unwrap();

    assert_eq!(summary.review_count, 3);
    assert_eq!(summary.average_rating, 4.0);
}
