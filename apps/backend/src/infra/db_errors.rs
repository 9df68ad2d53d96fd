//! SeaORM -> DomainError translation helpers.
//!
//! Repos convert `sea_orm::DbErr` into `DomainError` here, and higher layers
//! map `DomainError` to `AppError` via `From`. Unique-constraint violations
//! on the users email column become a `UniqueEmail` conflict so registration
//! can answer 409 instead of a generic storage failure.

use tracing::warn;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Extract table.column from SQLite "UNIQUE constraint failed: table.column"
/// error messages.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    let marker = "UNIQUE constraint failed: ";
    error_msg
        .find(marker)
        .and_then(|pos| error_msg[pos + marker.len()..].split_whitespace().next())
        .map(|s| s.trim_end_matches(','))
}

fn is_unique_email_violation(msg: &str) -> bool {
    // Postgres: SQLSTATE 23505 with the index/constraint name in the message.
    if mentions_sqlstate(msg, "23505") && msg.contains("email") {
        return true;
    }
    // SQLite: "UNIQUE constraint failed: users.email"
    matches!(
        extract_sqlite_table_column(msg),
        Some("users.email")
    )
}

/// Map a `DbErr` to a `DomainError`.
pub fn map_db_err(err: sea_orm::DbErr) -> DomainError {
    let msg = err.to_string();

    if is_unique_email_violation(&msg) {
        return DomainError::conflict(ConflictKind::UniqueEmail, "users.email already exists");
    }

    if mentions_sqlstate(&msg, "57P01") || msg.contains("pool timed out") {
        warn!(error = %msg, "database unavailable");
        return DomainError::infra(InfraErrorKind::DbUnavailable, msg);
    }

    DomainError::infra(InfraErrorKind::Other("db".to_string()), msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::domain::ConflictKind;

    fn exec_err(msg: &str) -> sea_orm::DbErr {
        sea_orm::DbErr::Custom(msg.to_string())
    }

    #[test]
    fn sqlite_unique_email_maps_to_conflict() {
        let err = exec_err("error returned from database: UNIQUE constraint failed: users.email");
        match map_db_err(err) {
            DomainError::Conflict(ConflictKind::UniqueEmail, _) => {}
            other => panic!("expected UniqueEmail conflict, got {other:?}"),
        }
    }

    #[test]
    fn postgres_unique_email_maps_to_conflict() {
        let err = exec_err(
            "error returned from database: duplicate key value violates unique constraint \
             \"idx_users_email_unique\" SQLSTATE(23505) Key (email)=(a@b.c) already exists.",
        );
        match map_db_err(err) {
            DomainError::Conflict(ConflictKind::UniqueEmail, _) => {}
            other => panic!("expected UniqueEmail conflict, got {other:?}"),
        }
    }

    #[test]
    fn other_unique_violation_is_not_email_conflict() {
        let err = exec_err("UNIQUE constraint failed: todos.id");
        assert!(!matches!(
            map_db_err(err),
            DomainError::Conflict(ConflictKind::UniqueEmail, _)
        ));
    }

    #[test]
    fn generic_error_maps_to_infra() {
        let err = exec_err("syntax error at or near SELECT");
        assert!(matches!(map_db_err(err), DomainError::Infra(_, _)));
    }
}
