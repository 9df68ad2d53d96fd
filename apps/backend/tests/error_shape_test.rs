mod common;

use actix_web::{test, web, App, HttpResponse};
use advisor_backend::errors::ErrorCode;
use advisor_backend::middleware::request_trace::RequestTrace;
use advisor_backend::AppError;

async fn failing_handler() -> Result<HttpResponse, AppError> {
    Err(AppError::validation(
        ErrorCode::ValidationError,
        "Example failure",
    ))
}

async fn leaking_handler() -> Result<HttpResponse, AppError> {
    Err(AppError::db("SQLSTATE(08006) host 10.0.0.3 refused"))
}

#[actix_web::test]
async fn error_body_follows_problem_details_contract() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/_test/error", web::get().to(failing_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/_test/error").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);

    let headers = resp.headers().clone();
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-request-id should be set");
    assert!(!request_id.is_empty());

    let content_type = headers.get("content-type").unwrap().to_str().unwrap();
    assert_eq!(content_type, "application/problem+json");

    let body: serde_json::Value = test::read_body_json(resp).await;
    for key in ["type", "title", "status", "detail", "code", "trace_id"] {
        assert!(body.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["detail"], "Example failure");
    assert_eq!(body["status"], 400);

    // trace id in body matches the request id header set by RequestTrace
    assert_eq!(body["trace_id"].as_str().unwrap(), request_id);
}

#[actix_web::test]
async fn server_error_bodies_hide_internal_detail() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/_test/db", web::get().to(leaking_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/_test/db").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 500);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "DB_ERROR");
    let detail = body["detail"].as_str().unwrap();
    assert!(!detail.contains("SQLSTATE"));
    assert!(!detail.contains("10.0.0.3"));
}
