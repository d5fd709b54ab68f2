//! Regression coverage for the HTTP error mapping.

use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::{App, ResponseError, test::{self}, web};
use rstest::rstest;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::Error;
use crate::inbound::http::json_config;

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(error.status_code(), expected);
}

#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("connection string leaked")
        .with_trace_id("abc")
        .with_details(json!({ "secret": "x" }));

    let response = error.error_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let header = response
        .headers()
        .get("trace-id")
        .expect("trace id header")
        .to_str()
        .expect("ascii header");
    assert_eq!(header, "abc");

    let bytes = to_bytes(response.into_body()).await.expect("read body");
    let payload: Error = serde_json::from_slice(&bytes).expect("error payload");
    assert_eq!(payload.message(), "Internal server error");
    assert!(payload.details().is_none());
    assert_eq!(payload.trace_id(), Some("abc"));
}

#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::conflict("username is already registered")
        .with_details(json!({ "field": "username" }));

    let response = error.error_response();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let bytes = to_bytes(response.into_body()).await.expect("read body");
    let payload: Error = serde_json::from_slice(&bytes).expect("error payload");
    assert_eq!(payload.message(), "username is already registered");
    assert_eq!(payload.details(), Some(&json!({ "field": "username" })));
}

#[derive(Debug, Deserialize)]
struct Echo {
    #[allow(dead_code)]
    value: i32,
}

#[actix_web::test]
async fn json_config_maps_payload_failures_to_the_error_schema() {
    let app = test::init_service(App::new().app_data(json_config()).route(
        "/",
        web::post().to(|_payload: web::Json<Echo>| async { actix_web::HttpResponse::Ok().finish() }),
    ))
    .await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/")
            .set_json(json!({ "value": "not a number" }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(response).await;
    let value: Value = serde_json::from_slice(&body).expect("error payload is JSON");
    assert_eq!(value.get("code"), Some(&json!("invalid_request")));
}
