#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::{HeaderName, CONTENT_TYPE};
use actix_web::{test, web, App, Error};
use serde_json::{json, Value};

use advisor_backend::config::db::DbProfile;
use advisor_backend::infra::state::build_state;
use advisor_backend::middleware::request_trace::RequestTrace;
use advisor_backend::middleware::structured_logger::StructuredLogger;
use advisor_backend::middleware::trace_span::TraceSpan;
use advisor_backend::routes;
use advisor_backend::state::app_state::AppState;
use advisor_backend::state::security_config::SecurityConfig;

// Logging is auto-installed for every test binary that pulls in this module.
#[ctor::ctor]
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Fresh in-memory sqlite state with migrations applied and a fixed test
/// secret.
pub async fn test_state() -> Result<AppState, Box<dyn std::error::Error>> {
    let security = SecurityConfig::new(b"test_secret_key_for_testing_purposes_only");
    let state = build_state()
        .with_db(DbProfile::Test)
        .with_security(security)
        .build()
        .await?;
    Ok(state)
}

/// Full middleware + route stack against the given state. The JwtExtract
/// scope wrapper is deliberately absent so `CurrentUser`'s self-verifying
/// path is exercised; the gate and rate limiting each have their own suite.
pub async fn test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}

pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", uuid::Uuid::new_v4().simple())
}

/// Register a user through the public endpoint and assert success.
pub async fn register_user<S>(app: &S, email: &str, password: &str)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({
            "email": email,
            "first_name": "Test",
            "last_name": "User",
            "password": password,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 201, "registration should succeed");
}

/// Log in through the public endpoint and return the bearer token.
pub async fn login_user<S>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 200, "login should succeed");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "bearer");
    body["access_token"]
        .as_str()
        .expect("access_token should be a string")
        .to_string()
}

/// Validate that an error response follows the problem+json contract and that
/// the body trace_id matches the x-trace-id header.
pub async fn assert_problem_details(
    resp: ServiceResponse<BoxBody>,
    expected_status: u16,
    expected_code: &str,
) -> Value {
    assert_eq!(resp.status().as_u16(), expected_status);

    let headers = resp.headers().clone();

    let trace_hdr = HeaderName::from_static("x-trace-id");
    let trace_id = headers
        .get(&trace_hdr)
        .and_then(|v| v.to_str().ok())
        .expect("x-trace-id header should be present")
        .to_string();
    assert!(!trace_id.is_empty());

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "Content-Type must be application/problem+json (got {content_type})"
    );

    let body: Value = test::read_body_json(resp).await;
    for key in ["type", "title", "status", "detail", "code", "trace_id"] {
        assert!(body.get(key).is_some(), "missing problem details key {key}");
    }
    assert_eq!(body["code"], expected_code);
    assert_eq!(body["status"], expected_status);
    assert_eq!(body["trace_id"].as_str(), Some(trace_id.as_str()));

    body
}
