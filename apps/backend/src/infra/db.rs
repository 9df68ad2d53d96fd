//! Database bootstrap: connect and run pending migrations.

use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbProfile};
use crate::error::AppError;

/// Connect to the database for the given profile and bring the schema up to
/// date. Single entrypoint used by `StateBuilder` and tests.
pub async fn bootstrap_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let url = db_url(profile.clone())?;

    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false)
        .connect_timeout(Duration::from_secs(10));

    // sqlite::memory: is one database per connection; cap the pool at a
    // single connection so every session sees the same schema.
    match profile {
        DbProfile::Prod => {
            opts.max_connections(10).min_connections(1);
        }
        DbProfile::Test => {
            opts.max_connections(1);
        }
    }

    let conn = Database::connect(opts)
        .await
        .map_err(|e| AppError::db(format!("failed to connect to database: {e}")))?;

    migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::db(format!("failed to run migrations: {e}")))?;

    info!(profile = ?profile, "database connected and migrated");
    Ok(conn)
}
