use std::time::SystemTime;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::mint_access_token;
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::auth::{self, RegisterUser};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

async fn register(
    app_state: web::Data<AppState>,
    body: ValidatedJson<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let request = RegisterUser {
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
        password: payload.password,
    };

    with_txn(&app_state, move |txn| {
        Box::pin(async move { auth::register(txn, request).await })
    })
    .await?;

    Ok(HttpResponse::Created().json(MessageResponse {
        message: "User registered successfully".to_string(),
    }))
}

async fn login(
    app_state: web::Data<AppState>,
    body: ValidatedJson<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let db = require_db(&app_state)?;

    let user = auth::authenticate(db, &payload.email, &payload.password).await?;
    let token = mint_access_token(user.id, &user.email, SystemTime::now(), &app_state.security)?;

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        // Alias kept for OAuth2-style clients that post to /token.
        .route("/token", web::post().to(login));
}
