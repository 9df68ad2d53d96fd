use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::extractors::auth_token::AuthToken;
use crate::state::app_state::AppState;

/// Authenticated identity for the current request. Built entirely from the
/// verified token claims; no database round-trip. The `id` claim is the
/// authoritative identity, `email` is carried for display and logging.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

impl CurrentUser {
    fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        let id = Uuid::parse_str(&claims.id).map_err(|_| AppError::unauthorized())?;
        Ok(CurrentUser {
            id,
            email: claims.sub.clone(),
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Claims placed in extensions by the JwtExtract middleware; routes
        // mounted outside that middleware verify the bearer token themselves.
        let result = if let Some(claims) = req.extensions().get::<Claims>() {
            CurrentUser::from_claims(claims)
        } else {
            AuthToken::parse(req).and_then(|auth| {
                let state = req
                    .app_data::<web::Data<AppState>>()
                    .ok_or_else(|| AppError::internal("AppState not available"))?;
                let claims = verify_access_token(&auth.token, &state.security)?;
                CurrentUser::from_claims(&claims)
            })
        };
        std::future::ready(result)
    }
}
