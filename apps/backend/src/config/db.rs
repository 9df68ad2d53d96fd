use std::env;

use crate::error::AppError;

/// Database profile enum for different environments
#[derive(Debug, Clone, PartialEq)]
pub enum DbProfile {
    /// Production database (Postgres, from DATABASE_URL)
    Prod,
    /// Test database (in-memory sqlite, hermetic per test binary)
    Test,
}

/// Resolve the connection URL for a profile.
pub fn db_url(profile: DbProfile) -> Result<String, AppError> {
    match profile {
        DbProfile::Prod => must_var("DATABASE_URL"),
        DbProfile::Test => Ok("sqlite::memory:".to_string()),
    }
}

/// Get required environment variable or return a config error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::{db_url, DbProfile};

    #[test]
    fn test_db_url_test_profile_is_memory_sqlite() {
        assert_eq!(db_url(DbProfile::Test).unwrap(), "sqlite::memory:");
    }

    #[test]
    #[serial_test::serial]
    fn test_db_url_prod_reads_env() {
        env::set_var("DATABASE_URL", "postgresql://app:pw@localhost:5432/advisor");
        let url = db_url(DbProfile::Prod).unwrap();
        assert_eq!(url, "postgresql://app:pw@localhost:5432/advisor");
        env::remove_var("DATABASE_URL");
    }

    #[test]
    #[serial_test::serial]
    fn test_db_url_prod_missing_env_var() {
        env::remove_var("DATABASE_URL");
        let result = db_url(DbProfile::Prod);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("DATABASE_URL"));
    }
}
