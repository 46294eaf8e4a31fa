use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::error::ApiError;
use crate::middleware::auth::AdminUser;
use crate::AppState;

use super::resolve_site_id;

/// DELETE /sites/{siteName} (admin) - cascade delete.
///
/// Every controller owned by the site goes first, then the site itself; no
/// orphaned controllers remain.
pub async fn site_delete(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(site_name): Path<String>,
) -> Result<StatusCode, ApiError> {
    let site_id = resolve_site_id(state.store.as_ref(), &site_name).await?;
    state.store.delete_site(site_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
