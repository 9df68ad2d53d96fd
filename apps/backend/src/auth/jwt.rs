use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Mint a signed access token binding the user id and email.
/// Expiry = `now` + the configured token lifetime.
pub fn mint_access_token(
    user_id: Uuid,
    email: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time".to_string()))?
        .as_secs() as i64;

    let exp = iat + security.token_ttl.as_secs() as i64;

    let claims = Claims {
        sub: email.to_string(),
        id: user_id.to_string(),
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify a token's signature and expiry and return its claims.
///
/// Every failure (malformed token, bad signature, expired) collapses to the
/// same uniform `AppError::unauthorized()` so callers cannot probe which
/// check failed. The underlying kind is logged at debug only.
pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    // Default Validation already checks exp; pin algorithm to configured algorithm.
    let validation = Validation::new(security.algorithm);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!(kind = ?e.kind(), "token verification failed");
        AppError::unauthorized()
    })
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use uuid::Uuid;

    use super::{mint_access_token, verify_access_token};
    use crate::state::security_config::SecurityConfig;
    use crate::AppError;

    #[test]
    fn test_mint_and_verify_roundtrip() {
        let security = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes());

        let user_id = Uuid::new_v4();
        let email = "test@example.com";
        let now = SystemTime::now();

        let token = mint_access_token(user_id, email, now, &security).unwrap();
        let claims = verify_access_token(&token, &security).unwrap();

        assert_eq!(claims.id, user_id.to_string());
        assert_eq!(claims.sub, email);
        assert_eq!(
            claims.iat,
            now.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
        );
        // Default TTL is 30 minutes
        assert_eq!(claims.exp, claims.iat + 30 * 60);
    }

    #[test]
    fn test_configured_ttl_is_honored() {
        let security = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes())
            .with_token_ttl_minutes(5);

        let token =
            mint_access_token(Uuid::new_v4(), "a@b.c", SystemTime::now(), &security).unwrap();
        let claims = verify_access_token(&token, &security).unwrap();
        assert_eq!(claims.exp, claims.iat + 5 * 60);
    }

    #[test]
    fn test_expired_token() {
        let security = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes());

        // 40 minutes ago so the 30-minute token is expired
        let now = SystemTime::now() - Duration::from_secs(40 * 60);

        let token = mint_access_token(Uuid::new_v4(), "test@example.com", now, &security).unwrap();
        let result = verify_access_token(&token, &security);

        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[test]
    fn test_bad_signature() {
        // Mint with secret A, verify with secret B
        let security_a = SecurityConfig::new("secret-A".as_bytes());
        let security_b = SecurityConfig::new("secret-B".as_bytes());

        let token =
            mint_access_token(Uuid::new_v4(), "test@example.com", SystemTime::now(), &security_a)
                .unwrap();
        let result = verify_access_token(&token, &security_b);

        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[test]
    fn test_garbage_token_fails_uniformly() {
        let security = SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes());

        let garbage = verify_access_token("not-a-jwt", &security);
        let expired = {
            let now = SystemTime::now() - Duration::from_secs(40 * 60);
            let token =
                mint_access_token(Uuid::new_v4(), "a@b.c", now, &security).unwrap();
            verify_access_token(&token, &security)
        };

        // Same variant and message regardless of underlying cause.
        let garbage = garbage.unwrap_err().to_string();
        let expired = expired.unwrap_err().to_string();
        assert_eq!(garbage, expired);
    }
}
