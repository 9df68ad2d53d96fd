//! JWT claims carried by backend-issued access tokens.

use serde::{Deserialize, Serialize};

/// Claims structure inserted into request extensions by the authentication
/// middleware after verification.
///
/// `id` is the authoritative user identifier; `sub` carries the email and is
/// informational only.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User email (informational)
    pub sub: String,
    /// User id (uuid string, authoritative)
    pub id: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}
