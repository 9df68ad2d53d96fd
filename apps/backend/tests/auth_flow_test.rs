mod common;

use actix_web::test;
use serde_json::json;

use common::{
    assert_problem_details, login_user, register_user, test_app, test_state, unique_email,
};

#[actix_web::test]
async fn register_login_and_me_flow() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state().await?;
    let security = state.security.clone();
    let app = test_app(state).await;

    let email = unique_email("flow");
    register_user(&app, &email, "s3cure-password").await;
    let token = login_user(&app, &email, "s3cure-password").await;

    // Token claims carry the email as subject and a uuid identity.
    let claims = advisor_backend::verify_access_token(&token, &security)?;
    assert_eq!(claims.sub, email);
    uuid::Uuid::parse_str(&claims.id)?;

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["first_name"], "Test");
    assert!(
        body.get("password_hash").is_none(),
        "hash must never be serialized"
    );

    Ok(())
}

#[actix_web::test]
async fn register_normalizes_email_case() -> Result<(), Box<dyn std::error::Error>> {
    let app = test_app(test_state().await?).await;

    let email = unique_email("case");
    let upper = email.to_uppercase();
    register_user(&app, &upper, "s3cure-password").await;

    // Login succeeds with any casing of the same address.
    login_user(&app, &email, "s3cure-password").await;
    login_user(&app, &upper, "s3cure-password").await;

    Ok(())
}

#[actix_web::test]
async fn duplicate_email_conflicts() -> Result<(), Box<dyn std::error::Error>> {
    let app = test_app(test_state().await?).await;

    let email = unique_email("dup");
    register_user(&app, &email, "s3cure-password").await;

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({
            "email": email.to_uppercase(),
            "first_name": "Other",
            "last_name": "User",
            "password": "another-password",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, 409, "EMAIL_TAKEN").await;

    // The failed registration left no trace: the original credentials still
    // work and the rejected attempt's password never took effect.
    login_user(&app, &email, "s3cure-password").await;

    let second_pw = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": "another-password" }))
        .to_request();
    let resp = test::call_service(&app, second_pw).await;
    assert_problem_details(resp, 401, "INVALID_CREDENTIALS").await;

    Ok(())
}

#[actix_web::test]
async fn wrong_password_and_unknown_email_look_identical(
) -> Result<(), Box<dyn std::error::Error>> {
    let app = test_app(test_state().await?).await;

    let email = unique_email("oracle");
    register_user(&app, &email, "correct-password").await;

    let wrong_pw = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, wrong_pw).await;
    let body_a = assert_problem_details(resp, 401, "INVALID_CREDENTIALS").await;

    let unknown = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": unique_email("nobody"), "password": "whatever" }))
        .to_request();
    let resp = test::call_service(&app, unknown).await;
    let body_b = assert_problem_details(resp, 401, "INVALID_CREDENTIALS").await;

    assert_eq!(body_a["detail"], body_b["detail"]);

    Ok(())
}

#[actix_web::test]
async fn me_requires_valid_token() -> Result<(), Box<dyn std::error::Error>> {
    let app = test_app(test_state().await?).await;

    let no_token = test::TestRequest::get().uri("/api/users/me").to_request();
    let resp = test::call_service(&app, no_token).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED_MISSING_BEARER").await;

    let garbage = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, garbage).await;
    assert_problem_details(resp, 401, "UNAUTHORIZED").await;

    Ok(())
}

#[actix_web::test]
async fn token_alias_matches_login() -> Result<(), Box<dyn std::error::Error>> {
    let app = test_app(test_state().await?).await;

    let email = unique_email("alias");
    register_user(&app, &email, "s3cure-password").await;

    let req = test::TestRequest::post()
        .uri("/auth/token")
        .set_json(json!({ "email": email, "password": "s3cure-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["token_type"], "bearer");

    Ok(())
}

#[actix_web::test]
async fn change_password_flow() -> Result<(), Box<dyn std::error::Error>> {
    let app = test_app(test_state().await?).await;

    let email = unique_email("pwchange");
    register_user(&app, &email, "old-password").await;
    let token = login_user(&app, &email, "old-password").await;
    let bearer = format!("Bearer {token}");

    // Mismatched confirmation is a 400 before any credential check.
    let req = test::TestRequest::put()
        .uri("/api/users/change-password")
        .insert_header(("Authorization", bearer.clone()))
        .set_json(json!({
            "current_password": "old-password",
            "new_password": "new-password",
            "new_password_confirm": "different",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, 400, "PASSWORD_MISMATCH").await;

    // Wrong current password is a 401.
    let req = test::TestRequest::put()
        .uri("/api/users/change-password")
        .insert_header(("Authorization", bearer.clone()))
        .set_json(json!({
            "current_password": "not-old-password",
            "new_password": "new-password",
            "new_password_confirm": "new-password",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, 401, "INVALID_CURRENT_PASSWORD").await;

    // Correct current password succeeds and rotates the credential.
    let req = test::TestRequest::put()
        .uri("/api/users/change-password")
        .insert_header(("Authorization", bearer))
        .set_json(json!({
            "current_password": "old-password",
            "new_password": "new-password",
            "new_password_confirm": "new-password",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let old_login = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": "old-password" }))
        .to_request();
    let resp = test::call_service(&app, old_login).await;
    assert_eq!(resp.status().as_u16(), 401);

    login_user(&app, &email, "new-password").await;

    Ok(())
}
