use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::ApiError;
use crate::middleware::auth::AdminUser;
use crate::store::models::Site;
use crate::validate;
use crate::AppState;

use super::{resolve_site_id, SiteBody};

/// PUT /sites/{siteName} (admin) - full replace.
///
/// Renaming to a name held by a different site is a conflict; replacing a
/// site under its own name is not.
pub async fn site_update(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(site_name): Path<String>,
    Json(body): Json<SiteBody>,
) -> Result<StatusCode, ApiError> {
    if !validate::site_name_is_valid(&body.site_name) {
        return Err(ApiError::SiteNameRestrictions);
    }

    let site_id = resolve_site_id(state.store.as_ref(), &site_name).await?;

    if body.site_name != site_name
        && state.store.find_site_by_name(&body.site_name).await?.is_some()
    {
        return Err(ApiError::SiteNameExists);
    }

    state
        .store
        .update_site(
            site_id,
            Site {
                site_id,
                site_name: body.site_name,
                site_description: body.site_description,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
