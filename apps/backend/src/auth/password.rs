//! Password hashing with Argon2.
//!
//! Hashes are PHC strings carrying their own salt and parameters; the stored
//! hash is opaque to the rest of the system. Verification is the library's
//! constant-time-safe routine.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordVerifier, SaltString},
    Argon2, PasswordHasher,
};

use crate::AppError;

/// Hash a plaintext password into a PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
/// Returns false on mismatch. A malformed stored hash is a server-side error:
/// the row is corrupt, and it must not authenticate.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::internal(format!("invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};

    #[test]
    fn hash_is_one_way_and_verifiable() {
        let hash = hash_password("Password1").unwrap();

        // The stored hash never equals the plaintext.
        assert_ne!(hash, "Password1");
        assert!(hash.starts_with("$argon2"));

        assert!(verify_password("Password1", &hash).unwrap());
        assert!(!verify_password("Password2", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        // Fresh salt per hash.
        let a = hash_password("Password1").unwrap();
        let b = hash_password("Password1").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("Password1", &a).unwrap());
        assert!(verify_password("Password1", &b).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(verify_password("Password1", "not-a-phc-string").is_err());
    }
}
