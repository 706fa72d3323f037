//! Tests for the diagnosis request handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{IntakeAcknowledgement, MockDiagnosisIntake};

fn test_app(
    intake: MockDiagnosisIntake,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::new(Arc::new(intake), "public")))
        .app_data(json_config())
        .service(
            web::scope("/api/v1")
                .service(submit_diagnosis_request)
                .service(diagnosis_api_status),
        )
}

fn accepting_intake() -> MockDiagnosisIntake {
    let mut intake = MockDiagnosisIntake::new();
    intake
        .expect_receive()
        .withf(|submission| submission.url == " example.com " && submission.email == "a@b.co")
        .times(1)
        .return_once(|_| {
            Ok(IntakeAcknowledgement {
                message: "登録完了".to_owned(),
                row_number: 2,
            })
        });
    intake
}

#[actix_web::test]
async fn accepted_request_returns_success_envelope() {
    let app = actix_test::init_service(test_app(accepting_intake())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/diagnosis-requests")
            .set_json(json!({ "url": " example.com ", "email": "a@b.co" }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({ "success": true, "message": "登録完了" }));
}

#[actix_web::test]
async fn body_without_json_content_type_is_accepted() {
    let app = actix_test::init_service(test_app(accepting_intake())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/diagnosis-requests")
            .insert_header(("Content-Type", "text/plain;charset=UTF-8"))
            .set_payload(r#"{"url":" example.com ","email":"a@b.co"}"#)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[case::validation(
    Error::invalid_request("URLを入力してください"),
    StatusCode::BAD_REQUEST,
    "URLを入力してください"
)]
#[case::ledger(
    Error::service_unavailable("停止中"),
    StatusCode::SERVICE_UNAVAILABLE,
    "停止中"
)]
#[case::internal(
    Error::internal("secret detail"),
    StatusCode::INTERNAL_SERVER_ERROR,
    "Internal server error"
)]
#[actix_web::test]
async fn failures_return_rejection_envelope(
    #[case] error: Error,
    #[case] status: StatusCode,
    #[case] message: &str,
) {
    let mut intake = MockDiagnosisIntake::new();
    intake
        .expect_receive()
        .times(1)
        .return_once(move |_| Err(error));
    let app = actix_test::init_service(test_app(intake)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/diagnosis-requests")
            .set_json(json!({}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), status);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({ "success": false, "message": message }));
}

#[actix_web::test]
async fn rejection_envelope_carries_trace_id() {
    let mut intake = MockDiagnosisIntake::new();
    intake
        .expect_receive()
        .times(1)
        .return_once(|_| Err(Error::service_unavailable("停止中").with_trace_id("trace-abc")));
    let app = actix_test::init_service(test_app(intake)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/diagnosis-requests")
            .set_json(json!({ "url": "example.com", "email": "a@b.co" }))
            .to_request(),
    )
    .await;

    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some("trace-abc")
    );
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body,
        json!({ "success": false, "message": "停止中", "traceId": "trace-abc" })
    );
}

#[actix_web::test]
async fn malformed_body_is_rejected_without_calling_intake() {
    let mut intake = MockDiagnosisIntake::new();
    intake.expect_receive().times(0);
    let app = actix_test::init_service(test_app(intake)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/diagnosis-requests")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn status_probe_reports_running() {
    let mut intake = MockDiagnosisIntake::new();
    intake.expect_receive().times(0);
    let app = actix_test::init_service(test_app(intake)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/diagnosis-requests")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body,
        json!({ "status": "ok", "message": "AI集客診断 API is running" })
    );
}

#[test]
fn missing_fields_become_empty_strings() {
    let body: DiagnosisRequestBody =
        serde_json::from_value(json!({ "url": null })).expect("decode body");
    let submission = DiagnosisSubmission::from(body);
    assert_eq!(submission, DiagnosisSubmission::default());
}
