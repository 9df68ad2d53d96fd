//! Exercises the JwtExtract scope gate wired the way main.rs wires it, and
//! in particular that its rejections honor the problem+json/trace-id
//! contract instead of escaping the tracing middleware unrendered.

mod common;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};

use advisor_backend::middleware::jwt_extract::JwtExtract;
use advisor_backend::middleware::request_trace::RequestTrace;
use advisor_backend::middleware::structured_logger::StructuredLogger;
use advisor_backend::middleware::trace_span::TraceSpan;
use advisor_backend::routes;
use advisor_backend::state::app_state::AppState;

use common::{assert_problem_details, login_user, register_user, test_state, unique_email};

/// Protected scope behind JwtExtract, matching the production layout.
async fn gated_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .service(web::scope("/auth").configure(routes::auth::configure_routes))
            .service(
                web::scope("/api")
                    .wrap(JwtExtract)
                    .service(web::scope("/users").configure(routes::users::configure_routes)),
            ),
    )
    .await
}

#[actix_web::test]
async fn gate_rejections_carry_trace_ids() -> Result<(), Box<dyn std::error::Error>> {
    let app = gated_app(test_state().await?).await;

    // No Authorization header at all.
    let req = test::TestRequest::get().uri("/api/users/me").to_request();
    let resp = test::call_service(&app, req).await;
    let request_id = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = assert_problem_details(resp, 401, "UNAUTHORIZED_MISSING_BEARER").await;

    // The 401 is built inside the request's trace scope, so it carries the
    // real per-request id, not the out-of-scope fallback.
    let trace_id = body["trace_id"].as_str().unwrap();
    assert_ne!(trace_id, "unknown");
    assert_eq!(request_id.as_deref(), Some(trace_id));

    // Garbage token gets the uniform verification failure, same contract.
    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body = assert_problem_details(resp, 401, "UNAUTHORIZED").await;
    assert_ne!(body["trace_id"].as_str().unwrap(), "unknown");

    Ok(())
}

#[actix_web::test]
async fn gate_admits_valid_tokens() -> Result<(), Box<dyn std::error::Error>> {
    let app = gated_app(test_state().await?).await;

    let email = unique_email("gate");
    register_user(&app, &email, "s3cure-password").await;
    let token = login_user(&app, &email, "s3cure-password").await;

    // Claims inserted by the middleware flow through to CurrentUser.
    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], email.as_str());

    Ok(())
}
