use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest};

use crate::error::AppError;

/// Raw bearer token pulled from the Authorization header.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
}

impl AuthToken {
    /// Parse "Bearer <token>" out of a request, if present and well-formed.
    pub fn parse(req: &HttpRequest) -> Result<Self, AppError> {
        let auth_header = req
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or_else(AppError::unauthorized_missing_bearer)?;

        let auth_value = auth_header
            .to_str()
            .map_err(|_| AppError::unauthorized_missing_bearer())?;

        let parts: Vec<&str> = auth_value.split_whitespace().collect();
        if parts.len() != 2 || parts[0] != "Bearer" || parts[1].is_empty() {
            return Err(AppError::unauthorized_missing_bearer());
        }

        Ok(AuthToken {
            token: parts[1].to_string(),
        })
    }
}

impl FromRequest for AuthToken {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        std::future::ready(Self::parse(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn parses_well_formed_bearer() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        let token = AuthToken::parse(&req).unwrap();
        assert_eq!(token.token, "abc.def.ghi");
    }

    #[test]
    fn rejects_missing_header() {
        let req = TestRequest::default().to_http_request();
        assert!(AuthToken::parse(&req).is_err());
    }

    #[test]
    fn rejects_wrong_scheme_and_empty_token() {
        for value in ["Basic abc", "Bearer", "Bearer a b"] {
            let req = TestRequest::default()
                .insert_header(("Authorization", value))
                .to_http_request();
            assert!(AuthToken::parse(&req).is_err(), "accepted {value:?}");
        }
    }
}
