// HTTP API error types.
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with stable machine-readable codes.
///
/// Remote-unavailable failures never appear here: they are contained inside
/// the gateway and rendered as "unreachable"/unknown status in the response
/// body instead of an error status.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),
    InvalidCredentials,

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    SiteNotFound,

    // 409 Conflict
    SiteNameExists,

    // 422 Unprocessable Entity
    SiteNameRestrictions,

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::SiteNotFound => StatusCode::NOT_FOUND,
            ApiError::SiteNameExists => StatusCode::CONFLICT,
            ApiError::SiteNameRestrictions => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable string code for client handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::SiteNotFound => "SITE_NOT_FOUND",
            ApiError::SiteNameExists => "SITENAME_ALREADY_EXISTS",
            ApiError::SiteNameRestrictions => "SITENAME_RESTRICTIONS",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Client-safe error message.
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::InvalidCredentials => "Invalid username or password",
            ApiError::Forbidden(msg) => msg,
            ApiError::SiteNotFound => "Site name does not resolve to a record",
            ApiError::SiteNameExists => "Site name is already in use",
            ApiError::SiteNameRestrictions => "Site name fails the name_en_15 pattern",
            ApiError::InternalServerError(msg) => msg,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "code": self.error_code(),
            "message": self.message(),
        })
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        match err {
            crate::store::StoreError::NotFound(_) => ApiError::SiteNotFound,
            other => {
                // Log the real error but return a generic message.
                tracing::error!("store error: {}", other);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
