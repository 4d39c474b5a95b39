use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Extension, Json, State};
use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use prescription_cell::handlers::*;
use prescription_cell::models::{
    CreatePrescriptionRequest, MedicationRequest, PrescriptionStatus, UpdateMedicationRequest,
    UpdatePrescriptionRequest,
};
use shared_config::AppConfig;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::extractor::{AppJson, AppPath};
use shared_utils::test_utils::{MockDbResponses, TestConfig, TestUser};

fn config_for(server: &MockServer) -> Arc<AppConfig> {
    TestConfig::with_database_url(&server.uri()).to_arc()
}

fn create_request(patient_id: i64) -> CreatePrescriptionRequest {
    CreatePrescriptionRequest {
        patient_id,
        appointment_id: None,
        description: "Antibiotics course".to_string(),
        date: None,
    }
}

async fn mount_prescription(server: &MockServer, id: i64, doctor_id: i64) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::prescription_row(id, doctor_id, 20)
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_patient_cannot_create_prescription() {
    let mock_server = MockServer::start().await;

    let caller = TestUser::patient(20).to_auth_user();
    let result = create_prescription(
        State(config_for(&mock_server)),
        Extension(caller),
        AppJson(create_request(20)),
    )
    .await;

    assert_matches!(result, Err(AppError::Forbidden));
}

#[tokio::test]
async fn test_create_rejects_non_patient_target() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("role", "eq.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let caller = TestUser::doctor(1).to_auth_user();
    let result = create_prescription(
        State(config_for(&mock_server)),
        Extension(caller),
        AppJson(create_request(2)),
    )
    .await;

    assert_matches!(result, Err(AppError::BadRequest(msg)) if msg == "Invalid patient ID.");
}

#[tokio::test]
async fn test_create_prescription_is_active_and_owned_by_caller() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", "eq.20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::user_row(20, Role::Patient, "Pat", "Smith")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/prescriptions"))
        .and(body_partial_json(json!({ "doctor_id": 1, "patient_id": 20, "status": 0 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockDbResponses::prescription_row(7, 1, 20)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let caller = TestUser::doctor(1).to_auth_user();
    let (status, headers, Json(body)) = create_prescription(
        State(config_for(&mock_server)),
        Extension(caller),
        AppJson(create_request(20)),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers["location"], "/api/prescriptions/7");
    assert_eq!(body["PrescriptionId"], 7);
}

#[tokio::test]
async fn test_get_prescription_includes_names_and_medications() {
    let mock_server = MockServer::start().await;

    mount_prescription(&mock_server, 7, 1).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/medications"))
        .and(query_param("prescription_id", "in.(7)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::medication_row(11, 7),
            MockDbResponses::medication_row(12, 7)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .and(query_param("id", "in.(1,20)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::user_row(1, Role::Doctor, "Lisa", "Cuddy"),
            MockDbResponses::user_row(20, Role::Patient, "Pat", "Smith")
        ])))
        .mount(&mock_server)
        .await;

    let caller = TestUser::patient(20).to_auth_user();
    let Json(prescription) = get_prescription(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath(7),
    )
    .await
    .unwrap();

    assert_eq!(prescription.doctor_name, "Lisa Cuddy");
    assert_eq!(prescription.patient_name, "Pat Smith");
    assert_eq!(prescription.status, PrescriptionStatus::Active);
    assert_eq!(prescription.medications.len(), 2);
}

#[tokio::test]
async fn test_missing_prescription_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let caller = TestUser::doctor(1).to_auth_user();
    let result = get_prescription(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath(99),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(msg)) if msg == "Prescription not found.");
}

#[tokio::test]
async fn test_assistant_is_outside_prescription_roles() {
    let mock_server = MockServer::start().await;

    let caller = TestUser::assistant(30).to_auth_user();
    let result = get_prescription(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath(7),
    )
    .await;

    assert_matches!(result, Err(AppError::Forbidden));
}

#[tokio::test]
async fn test_patient_lists_only_own_prescriptions() {
    let mock_server = MockServer::start().await;

    let caller = TestUser::patient(20).to_auth_user();
    let result = get_prescriptions_for_patient(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath(21),
    )
    .await;

    assert_matches!(
        result,
        Err(AppError::Unauthorized(msg)) if msg == "You can only view your own prescriptions."
    );
}

#[tokio::test]
async fn test_empty_appointment_listing_skips_lookups() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/prescriptions"))
        .and(query_param("appointment_id", "eq.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/medications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let caller = TestUser::doctor(1).to_auth_user();
    let Json(prescriptions) = get_prescriptions_for_appointment(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath(5),
    )
    .await
    .unwrap();

    assert!(prescriptions.is_empty());
}

#[tokio::test]
async fn test_only_prescribing_doctor_can_update() {
    let mock_server = MockServer::start().await;

    mount_prescription(&mock_server, 7, 1).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/prescriptions"))
        .and(body_partial_json(json!({ "status": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::prescription_row(7, 1, 20)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cancel = || UpdatePrescriptionRequest {
        description: None,
        status: Some(PrescriptionStatus::Canceled),
    };

    let intruder = TestUser::doctor(2).to_auth_user();
    let denied = update_prescription(
        State(config_for(&mock_server)),
        Extension(intruder),
        AppPath(7),
        AppJson(cancel()),
    )
    .await;
    assert_matches!(
        denied,
        Err(AppError::Unauthorized(msg))
            if msg == "You are not authorized to update this prescription."
    );

    let owner = TestUser::doctor(1).to_auth_user();
    let Json(body) = update_prescription(
        State(config_for(&mock_server)),
        Extension(owner),
        AppPath(7),
        AppJson(cancel()),
    )
    .await
    .unwrap();
    assert_eq!(body["Message"], "Prescription updated successfully.");
}

#[tokio::test]
async fn test_other_doctor_cannot_add_medication() {
    let mock_server = MockServer::start().await;

    mount_prescription(&mock_server, 7, 1).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/medications"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let caller = TestUser::doctor(2).to_auth_user();
    let request = MedicationRequest {
        name: "Amoxicillin".to_string(),
        dosage: "500mg".to_string(),
        frequency: "3x daily".to_string(),
        notes: None,
    };
    let result = add_medication(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath(7),
        AppJson(request),
    )
    .await;

    assert_matches!(
        result,
        Err(AppError::Unauthorized(msg))
            if msg == "You are not authorized to modify this prescription."
    );
}

#[tokio::test]
async fn test_update_medication_checks_parent_owner() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/medications"))
        .and(query_param("id", "eq.11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::medication_row(11, 7)
        ])))
        .mount(&mock_server)
        .await;

    mount_prescription(&mock_server, 7, 1).await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/medications"))
        .and(body_partial_json(json!({ "dosage": "250mg" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::medication_row(11, 7)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let caller = TestUser::doctor(1).to_auth_user();
    let request = UpdateMedicationRequest {
        dosage: Some("250mg".to_string()),
        ..Default::default()
    };
    let Json(body) = update_medication(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath(11),
        AppJson(request),
    )
    .await
    .unwrap();

    assert_eq!(body["Message"], "Medication updated successfully.");
}

#[tokio::test]
async fn test_delete_missing_medication_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/medications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let caller = TestUser::doctor(1).to_auth_user();
    let result = delete_medication(
        State(config_for(&mock_server)),
        Extension(caller),
        AppPath(404),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(msg)) if msg == "Medication not found.");
}

#[tokio::test]
async fn test_other_doctor_cannot_delete_prescription() {
    let mock_server = MockServer::start().await;

    mount_prescription(&mock_server, 7, 1).await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let intruder = TestUser::doctor(2).to_auth_user();
    let result = delete_prescription(
        State(config_for(&mock_server)),
        Extension(intruder),
        AppPath(7),
    )
    .await;

    assert_matches!(
        result,
        Err(AppError::Unauthorized(msg))
            if msg == "You are not authorized to delete this prescription."
    );
}

#[tokio::test]
async fn test_owner_delete_removes_medications_first() {
    let mock_server = MockServer::start().await;

    mount_prescription(&mock_server, 7, 1).await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/medications"))
        .and(query_param("prescription_id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::medication_row(11, 7)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/prescriptions"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::prescription_row(7, 1, 20)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let owner = TestUser::doctor(1).to_auth_user();
    let Json(body) = delete_prescription(
        State(config_for(&mock_server)),
        Extension(owner),
        AppPath(7),
    )
    .await
    .unwrap();
    assert_eq!(body["Message"], "Prescription deleted successfully.");

    let deleted: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| request.method.to_string() == "DELETE")
        .map(|request| request.url.path().to_string())
        .collect();
    assert_eq!(deleted, vec!["/rest/v1/medications", "/rest/v1/prescriptions"]);
}

#[tokio::test]
async fn test_other_doctor_cannot_delete_medication() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/medications"))
        .and(query_param("id", "eq.11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::medication_row(11, 7)
        ])))
        .mount(&mock_server)
        .await;

    mount_prescription(&mock_server, 7, 1).await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let intruder = TestUser::doctor(2).to_auth_user();
    let result = delete_medication(
        State(config_for(&mock_server)),
        Extension(intruder),
        AppPath(11),
    )
    .await;

    assert_matches!(
        result,
        Err(AppError::Unauthorized(msg))
            if msg == "You are not authorized to modify this prescription."
    );
}
