//! Rate limiting configuration helpers.
//!
//! Per-IP fixed windows:
//! - Authentication endpoints: 10 requests per minute
//! - Advisor endpoints: 15 requests per minute (upstream calls are costly)
//! - Health check is exempt

use std::time::Duration;

use actix_extensible_rate_limit::backend::SimpleInputFunctionBuilder;

/// Limits login/registration probing: 10 requests per 60 seconds per IP.
pub fn auth_rate_limit_config() -> SimpleInputFunctionBuilder {
    SimpleInputFunctionBuilder::new(Duration::from_secs(60), 10).real_ip_key()
}

/// Caps advisor traffic ahead of the upstream API: 15 requests per 60
/// seconds per IP.
pub fn advisor_rate_limit_config() -> SimpleInputFunctionBuilder {
    SimpleInputFunctionBuilder::new(Duration::from_secs(60), 15).real_ip_key()
}
