use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::repos::users::{self, User};
use crate::services::auth;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user
                .created_at
                .format(&Rfc3339)
                .unwrap_or_else(|_| user.created_at.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

async fn me(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let user = users::find_by_id(db, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found"))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

async fn change_password(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
    body: ValidatedJson<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    let user_id = current_user.id;

    with_txn(&app_state, move |txn| {
        Box::pin(async move {
            auth::change_password(
                txn,
                user_id,
                &payload.current_password,
                &payload.new_password,
                &payload.new_password_confirm,
            )
            .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/me", web::get().to(me))
        .route("/change-password", web::put().to(change_password));
}
