use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Extension, Json, State};
use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use office_cell::handlers::*;
use office_cell::models::OfficeRequest;
use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::extractor::{AppJson, AppPath};
use shared_utils::test_utils::{MockDbResponses, TestConfig, TestUser};

fn config_for(server: &MockServer) -> Arc<AppConfig> {
    TestConfig::with_database_url(&server.uri()).to_arc()
}

async fn mount_office(server: &MockServer, office_id: i64) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/offices"))
        .and(query_param("id", format!("eq.{}", office_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::office_row(office_id)
        ])))
        .mount(server)
        .await;
}

fn doctor_in_office(id: i64, office_id: Option<i64>) -> serde_json::Value {
    let mut row = MockDbResponses::user_row(id, Role::Doctor, "Lisa", "Cuddy");
    row["office_id"] = json!(office_id);
    row
}

#[tokio::test]
async fn test_get_office_lists_doctor_ids() {
    let mock_server = MockServer::start().await;

    mount_office(&mock_server, 3).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("office_id", "eq.3"))
        .and(query_param("role", "eq.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            doctor_in_office(1, Some(3)),
            doctor_in_office(4, Some(3))
        ])))
        .mount(&mock_server)
        .await;

    let Json(office) = get_office(State(config_for(&mock_server)), AppPath(3)).await.unwrap();

    assert_eq!(office.doctor_ids, vec![1, 4]);
    let body = serde_json::to_value(&office).unwrap();
    assert_eq!(body["zipCode"], "M5X 1A9");
}

#[tokio::test]
async fn test_missing_office_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/offices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = get_office(State(config_for(&mock_server)), AppPath(9)).await;

    assert_matches!(result, Err(AppError::NotFound(msg)) if msg == "Office not found.");
}

#[tokio::test]
async fn test_list_offices_groups_doctors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/offices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::office_row(1),
            MockDbResponses::office_row(2)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("office_id", "in.(1,2)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 10, "office_id": 2 },
            { "id": 11, "office_id": 2 }
        ])))
        .mount(&mock_server)
        .await;

    let Json(offices) = list_offices(State(config_for(&mock_server))).await.unwrap();

    assert_eq!(offices.len(), 2);
    assert!(offices[0].doctor_ids.is_empty());
    assert_eq!(offices[1].doctor_ids, vec![10, 11]);
}

#[tokio::test]
async fn test_create_office_requires_address() {
    let mock_server = MockServer::start().await;

    let caller = TestUser::assistant(30).to_auth_user();
    let result = create_office(
        State(config_for(&mock_server)),
        Extension(caller),
        AppJson(OfficeRequest::default()),
    )
    .await;

    assert_matches!(result, Err(AppError::Validation(errors)) if errors.contains("Address"));
}

#[tokio::test]
async fn test_create_office_returns_created() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/offices"))
        .and(body_partial_json(json!({ "address": "100 King St W" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([MockDbResponses::office_row(5)])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let caller = TestUser::patient(20).to_auth_user();
    let request = OfficeRequest {
        name: Some("Downtown Clinic".to_string()),
        address: "100 King St W".to_string(),
        city: Some("Toronto".to_string()),
        ..Default::default()
    };
    let (status, _, Json(body)) = create_office(
        State(config_for(&mock_server)),
        Extension(caller),
        AppJson(request),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["OfficeId"], 5);
}

#[tokio::test]
async fn test_assign_unknown_doctor_is_not_found() {
    let mock_server = MockServer::start().await;

    mount_office(&mock_server, 3).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let caller = TestUser::doctor(1).to_auth_user();
    let result = assign_doctor(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath((3, 77)),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(msg)) if msg == "Doctor not found.");
}

#[tokio::test]
async fn test_assign_doctor_sets_office() {
    let mock_server = MockServer::start().await;

    mount_office(&mock_server, 3).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", "eq.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([doctor_in_office(1, None)])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", "eq.1"))
        .and(body_partial_json(json!({ "office_id": 3 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([doctor_in_office(1, Some(3))])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let caller = TestUser::doctor(1).to_auth_user();
    let Json(body) = assign_doctor(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath((3, 1)),
    )
    .await
    .unwrap();

    assert_eq!(body["Message"], "Doctor assigned to office successfully.");
}

#[tokio::test]
async fn test_unassign_requires_current_office() {
    let mock_server = MockServer::start().await;

    mount_office(&mock_server, 3).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([doctor_in_office(1, Some(8))])),
        )
        .mount(&mock_server)
        .await;

    let caller = TestUser::doctor(1).to_auth_user();
    let result = unassign_doctor(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath((3, 1)),
    )
    .await;

    assert_matches!(result, Err(AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_patient_cannot_assign_doctors() {
    let mock_server = MockServer::start().await;

    let caller = TestUser::patient(20).to_auth_user();
    let result = assign_doctor(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath((3, 1)),
    )
    .await;

    assert_matches!(result, Err(AppError::Forbidden));
}
