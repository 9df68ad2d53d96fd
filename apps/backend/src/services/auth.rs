//! Authentication service: credential verification, registration, password
//! change. The sole producer of authenticated user records; token handling
//! lives in `auth::jwt`.

use sea_orm::ConnectionTrait;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::repos::users::{self, NewUser, User};

/// Normalize an email for storage and lookup. Case-insensitive comparison is
/// achieved by storing and querying the lowercased form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Verify an email/password pair against the credential store.
///
/// An unknown email and a wrong password collapse to the same failure; the
/// audit log entry carries the (redacted) email, never the password.
pub async fn authenticate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    if email.trim().is_empty() || password.is_empty() {
        warn!("login attempt with empty credentials");
        return Err(AppError::invalid_credentials());
    }

    let email = normalize_email(email);

    let user = match users::find_by_email(conn, &email).await? {
        Some(user) => user,
        None => {
            warn!(email = %Redacted(&email), "authentication failed: user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(email = %Redacted(&email), "authentication failed: invalid password");
        return Err(AppError::invalid_credentials());
    }

    Ok(user)
}

#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Register a new user. The password is hashed before it reaches storage; a
/// unique-email violation maps to a 409 via the domain error layer. Runs on
/// whatever connection the caller provides; route handlers pass a
/// transaction so a failed registration leaves no partial row.
pub async fn register<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    request: RegisterUser,
) -> Result<User, AppError> {
    let email = normalize_email(&request.email);
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation(
            ErrorCode::InvalidEmail,
            "A valid email address is required",
        ));
    }
    if request.password.is_empty() {
        return Err(AppError::validation(
            ErrorCode::ValidationError,
            "Password cannot be empty",
        ));
    }
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(AppError::validation(
            ErrorCode::ValidationError,
            "First and last name are required",
        ));
    }

    let password_hash = hash_password(&request.password)?;

    let user = users::create(
        conn,
        NewUser {
            email: email.clone(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            password_hash,
        },
    )
    .await?;

    info!(user_id = %user.id, email = %Redacted(&email), "user registered");
    Ok(user)
}

/// Change a user's password after verifying the current one.
pub async fn change_password<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: uuid::Uuid,
    current_password: &str,
    new_password: &str,
    new_password_confirm: &str,
) -> Result<(), AppError> {
    if new_password.is_empty() || new_password != new_password_confirm {
        return Err(AppError::bad_request(
            ErrorCode::PasswordMismatch,
            "New passwords do not match",
        ));
    }

    let user = users::find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found"))?;

    if !verify_password(current_password, &user.password_hash)? {
        warn!(user_id = %user_id, "password change rejected: current password invalid");
        return Err(AppError::Unauthorized {
            code: ErrorCode::InvalidCurrentPassword,
            detail: "Current password is incorrect".to_string(),
        });
    }

    let new_hash = hash_password(new_password)?;
    users::update_password_hash(conn, user_id, new_hash).await?;

    info!(user_id = %user_id, "password changed");
    Ok(())
}
