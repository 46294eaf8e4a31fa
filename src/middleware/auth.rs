use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};

use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;
use crate::store::models::ROLE_ADMINISTRATOR;

/// Authenticated caller context extracted from the bearer token.
///
/// Used as an extractor: any handler taking `AuthUser` requires a valid
/// member-tier token (401 otherwise). The route table stays free of
/// framework middleware state; the auth tier is part of each handler's
/// signature.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub role: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            role: claims.role,
        }
    }
}

/// Admin-tier caller: a valid token whose role is `administrator`.
/// Handlers for create/update/delete take this instead of `AuthUser`.
#[derive(Clone, Debug)]
pub struct AdminUser(pub AuthUser);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_from_headers(&parts.headers).map_err(ApiError::unauthorized)?;
        let claims = validate_jwt(&token).map_err(ApiError::unauthorized)?;
        Ok(AuthUser::from(claims))
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMINISTRATOR {
            return Err(ApiError::forbidden("Administrator token required"));
        }
        Ok(AdminUser(user))
    }
}

/// Extract the bearer token from the Authorization header.
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn rejects_missing_and_malformed_headers() {
        let empty = HeaderMap::new();
        assert!(extract_jwt_from_headers(&empty).is_err());

        let mut basic = HeaderMap::new();
        basic.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(extract_jwt_from_headers(&basic).is_err());

        let mut blank = HeaderMap::new();
        blank.insert("authorization", HeaderValue::from_static("Bearer  "));
        assert!(extract_jwt_from_headers(&blank).is_err());
    }

    #[test]
    fn accepts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "abc.def.ghi");
    }
}
