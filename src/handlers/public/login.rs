// POST /users/login - credential check and token issuance.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::{self, Claims};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
    pub expires_in: u64,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: String,
    pub username: String,
    pub role: String,
}

/// Verify the stored credential digest and hand out a bearer token carrying
/// the user's capability tier. Lookup misses and digest mismatches produce
/// the same response.
pub async fn login_post(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .store
        .find_user(&body.username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let credentials = state
        .store
        .credentials_for(&user.id)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !auth::verify_password(&body.password, &credentials.password) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = auth::generate_jwt(Claims::new(user.username.clone(), user.role.clone()))
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    tracing::info!(username = %user.username, role = %user.role, "login succeeded");

    Ok(Json(LoginResponse {
        token,
        expires_in: crate::config::config().security.jwt_expiry_hours * 3600,
        user: LoginUser {
            id: user.id,
            username: user.username,
            role: user.role,
        },
    }))
}
