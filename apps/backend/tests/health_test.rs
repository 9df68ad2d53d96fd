mod common;

use actix_web::test;

use common::{test_app, test_state};

#[actix_web::test]
async fn health_reports_ok_with_migrations() -> Result<(), Box<dyn std::error::Error>> {
    let app = test_app(test_state().await?).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert!(body.get("db_error").is_none());
    assert!(body["app_version"].as_str().is_some_and(|v| !v.is_empty()));
    // The initial schema migration must be reported as applied.
    assert!(body["migrations"]
        .as_str()
        .is_some_and(|m| m.contains("init")));
    assert!(body["time"].as_str().is_some_and(|t| t.contains('T')));

    Ok(())
}
