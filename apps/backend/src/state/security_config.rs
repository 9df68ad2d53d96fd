use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Default access token lifetime in minutes.
pub const DEFAULT_TOKEN_TTL_MINUTES: u64 = 30;

/// Configuration for JWT security settings. Loaded once at startup and
/// treated as read-only for the life of the process.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// JWT secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm to use (defaults to HS256)
    pub algorithm: Algorithm,
    /// Access token lifetime (expiry = issuance time + ttl)
    pub token_ttl: Duration,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret and the default
    /// 30-minute token lifetime.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_MINUTES * 60),
        }
    }

    pub fn with_token_ttl_minutes(mut self, minutes: u64) -> Self {
        self.token_ttl = Duration::from_secs(minutes * 60);
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
