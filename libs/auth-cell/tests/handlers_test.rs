use std::sync::Arc;

use assert_matches::assert_matches;
use axum::{
    extract::{Extension, Json, State},
    http::{header::LOCATION, StatusCode},
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::handlers::{login, me, register};
use auth_cell::models::{LoginRequest, RegisterRequest};
use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::extractor::AppJson;
use shared_utils::jwt::validate_token;
use shared_utils::password::PasswordService;
use shared_utils::test_utils::{MockDbResponses, TestConfig, TestUser};

fn config_for(server: &MockServer) -> Arc<AppConfig> {
    TestConfig::with_database_url(&server.uri()).to_arc()
}

fn register_request(email: &str) -> RegisterRequest {
    serde_json::from_value(json!({
        "firstName": "Ann",
        "lastName": "Lee",
        "email": email,
        "password": "secret1",
        "role": 1,
        "dateOfBirth": "1990-02-01T00:00:00Z"
    }))
    .unwrap()
}

#[tokio::test]
async fn test_register_creates_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.ann@x.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .and(body_partial_json(json!({ "email": "ann@x.com", "role": 1 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockDbResponses::user_row(21, Role::Patient, "Ann", "Lee")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = register(
        State(config_for(&mock_server)),
        AppJson(register_request("ann@x.com")),
    )
    .await;

    let (status, headers, Json(body)) = result.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers[LOCATION], "/api/users/21");
    assert_eq!(body["Message"], "User registered successfully.");
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::user_row(3, Role::Doctor, "Ann", "Lee")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = register(
        State(config_for(&mock_server)),
        AppJson(register_request("ann@x.com")),
    )
    .await;

    assert_matches!(
        result,
        Err(AppError::BadRequest(msg)) if msg == "Email is already registered."
    );
}

#[tokio::test]
async fn test_register_validates_before_touching_database() {
    let mock_server = MockServer::start().await;

    let mut request = register_request("not-an-email");
    request.password = "abc".to_string();

    let result = register(State(config_for(&mock_server)), AppJson(request)).await;

    assert_matches!(result, Err(AppError::Validation(errors)) => {
        assert!(errors.contains("Email"));
        assert!(errors.contains("Password"));
    });
}

#[tokio::test]
async fn test_login_matches_email_case_insensitively() {
    let mock_server = MockServer::start().await;

    let mut row = MockDbResponses::user_row(21, Role::Patient, "Ann", "Lee");
    row["email"] = json!("ann@x.com");
    row["password"] = json!(PasswordService::hash_password("secret1").unwrap());

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("email", "eq.ann@x.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let result = login(
        State(config.clone()),
        AppJson(LoginRequest {
            email: "Ann@X.com".to_string(),
            password: "secret1".to_string(),
        }),
    )
    .await;

    let Json(body) = result.unwrap();
    let token = body["Token"].as_str().unwrap();
    let user = validate_token(token, &config).unwrap();
    assert_eq!(user.id, 21);
    assert_eq!(user.role, Role::Patient);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let mock_server = MockServer::start().await;

    let mut row = MockDbResponses::user_row(21, Role::Patient, "Ann", "Lee");
    row["password"] = json!(PasswordService::hash_password("secret1").unwrap());

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(&mock_server)
        .await;

    let result = login(
        State(config_for(&mock_server)),
        AppJson(LoginRequest {
            email: "ann.lee@example.com".to_string(),
            password: "wrong-one".to_string(),
        }),
    )
    .await;

    assert_matches!(
        result,
        Err(AppError::Unauthorized(msg)) if msg == "Invalid email or password."
    );
}

#[tokio::test]
async fn test_login_unknown_email_is_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let result = login(
        State(config_for(&mock_server)),
        AppJson(LoginRequest {
            email: "ghost@x.com".to_string(),
            password: "secret1".to_string(),
        }),
    )
    .await;

    assert_matches!(result, Err(AppError::Unauthorized(_)));
}

#[tokio::test]
async fn test_me_returns_profile_from_token_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", "eq.21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::user_row(21, Role::Patient, "Ann", "Lee")
        ])))
        .mount(&mock_server)
        .await;

    let caller = TestUser::patient(21).to_auth_user();
    let Json(profile) = me(State(config_for(&mock_server)), Extension(caller)).await.unwrap();

    assert_eq!(profile.id, 21);
    assert_eq!(profile.first_name, "Ann");
    assert_eq!(profile.role, Role::Patient);
}

#[tokio::test]
async fn test_me_for_deleted_user_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let caller = TestUser::doctor(5).to_auth_user();
    let result = me(State(config_for(&mock_server)), Extension(caller)).await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}
