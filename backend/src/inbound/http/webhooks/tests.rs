//! Tests for the webhook endpoint.

use std::sync::Arc;

use super::*;
use crate::domain::ports::MockWebhookCommand;
use crate::domain::{SVIX_ID_HEADER, SVIX_SIGNATURE_HEADER, SVIX_TIMESTAMP_HEADER};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::Value;
use uuid::Uuid;

const BODY: &str = r#"{"type":"user.created","data":{"id":"u1"}}"#;

fn test_app(
    command: MockWebhookCommand,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(command));
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api/v1").service(receive_clerk_webhook))
}

fn signed_request() -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/v1/webhooks/clerk")
        .insert_header((SVIX_ID_HEADER, "msg_1"))
        .insert_header((SVIX_TIMESTAMP_HEADER, "1700000000"))
        .insert_header((SVIX_SIGNATURE_HEADER, "v1,c2ln"))
        .insert_header(("content-type", "application/json"))
        .set_payload(BODY)
}

#[rstest]
#[actix_web::test]
async fn forwards_raw_body_and_headers_to_command() {
    let user_id = Uuid::from_u128(7);
    let mut command = MockWebhookCommand::new();
    command
        .expect_handle()
        .withf(|payload, headers| {
            payload == BODY.as_bytes()
                && headers.id() == "msg_1"
                && headers.timestamp() == "1700000000"
                && headers.signature() == "v1,c2ln"
        })
        .times(1)
        .returning(move |_, _| {
            Ok(SyncOutcome::processed(
                "user.created",
                "user created",
                Some(user_id),
            ))
        });
    let app = actix_test::init_service(test_app(command)).await;

    let response = actix_test::call_service(&app, signed_request().to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], "processed");
    assert_eq!(body["eventType"], "user.created");
    assert_eq!(body["userId"], user_id.to_string());
}

#[rstest]
#[actix_web::test]
async fn ignored_events_are_acknowledged() {
    let mut command = MockWebhookCommand::new();
    command
        .expect_handle()
        .times(1)
        .returning(|_, _| Ok(SyncOutcome::ignored("session.created")));
    let app = actix_test::init_service(test_app(command)).await;

    let response = actix_test::call_service(&app, signed_request().to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["status"], "ignored");
    assert!(body.get("userId").is_none());
}

#[rstest]
#[case(SVIX_ID_HEADER)]
#[case(SVIX_TIMESTAMP_HEADER)]
#[case(SVIX_SIGNATURE_HEADER)]
#[actix_web::test]
async fn missing_signature_header_is_bad_request(#[case] omitted: &'static str) {
    let mut command = MockWebhookCommand::new();
    command.expect_handle().never();
    let app = actix_test::init_service(test_app(command)).await;

    let mut request = actix_test::TestRequest::post()
        .uri("/api/v1/webhooks/clerk")
        .set_payload(BODY);
    for (name, value) in [
        (SVIX_ID_HEADER, "msg_1"),
        (SVIX_TIMESTAMP_HEADER, "1700000000"),
        (SVIX_SIGNATURE_HEADER, "v1,c2ln"),
    ] {
        if name != omitted {
            request = request.insert_header((name, value));
        }
    }

    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "missing_header");
    assert_eq!(body["details"]["header"], omitted);
}

#[rstest]
#[actix_web::test]
async fn blank_signature_header_is_bad_request() {
    let mut command = MockWebhookCommand::new();
    command.expect_handle().never();
    let app = actix_test::init_service(test_app(command)).await;

    let request = signed_request()
        .insert_header((SVIX_SIGNATURE_HEADER, "  "))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn command_rejection_keeps_status_and_details() {
    let mut command = MockWebhookCommand::new();
    command.expect_handle().times(1).returning(|_, _| {
        Err(Error::invalid_request("webhook verification failed")
            .with_details(serde_json::json!({ "code": "invalid_signature" })))
    });
    let app = actix_test::init_service(test_app(command)).await;

    let response = actix_test::call_service(&app, signed_request().to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_signature");
}

#[rstest]
#[actix_web::test]
async fn command_failure_is_redacted() {
    let mut command = MockWebhookCommand::new();
    command
        .expect_handle()
        .times(1)
        .returning(|_, _| Err(Error::internal("user sync repository error: connection refused")));
    let app = actix_test::init_service(test_app(command)).await;

    let response = actix_test::call_service(&app, signed_request().to_request()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "Internal server error");
}
