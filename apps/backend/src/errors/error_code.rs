//! Error codes for the advisor backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the advisor backend API.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string that appears
/// in HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required / token could not be validated
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Wrong email/password combination
    InvalidCredentials,
    /// Current password did not verify on a password change
    InvalidCurrentPassword,

    // Request Validation
    /// Invalid email address
    InvalidEmail,
    /// New password and confirmation do not match
    PasswordMismatch,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// User not found
    UserNotFound,
    /// Todo not found
    TodoNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Unique email constraint violated on registration
    EmailTaken,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Configuration error
    ConfigError,
    /// Internal server error
    InternalError,

    // Upstream (advisory proxy)
    /// The completion API rate-limited us
    UpstreamRateLimited,
    /// The completion API failed or was unreachable
    UpstreamError,
}

impl ErrorCode {
    /// Canonical string as it appears in HTTP responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::InvalidCurrentPassword => "INVALID_CURRENT_PASSWORD",
            ErrorCode::InvalidEmail => "INVALID_EMAIL",
            ErrorCode::PasswordMismatch => "PASSWORD_MISMATCH",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::TodoNotFound => "TODO_NOT_FOUND",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::EmailTaken => "EMAIL_TAKEN",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::DbError => "DB_ERROR",
            ErrorCode::DbUnavailable => "DB_UNAVAILABLE",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::InternalError => "INTERNAL",
            ErrorCode::UpstreamRateLimited => "UPSTREAM_RATE_LIMITED",
            ErrorCode::UpstreamError => "UPSTREAM_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
