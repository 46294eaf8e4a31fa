use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::middleware::auth::AdminUser;
use crate::store::models::Site;
use crate::validate;
use crate::views::SiteCreatedView;
use crate::AppState;

use super::SiteBody;

/// POST /sites (admin) - create a site with an empty controller set.
///
/// The uniqueness check is check-then-create: two concurrent creates of the
/// same name can both pass it. The file store offers no unique-constraint
/// primitive, so this race is accepted and documented.
pub async fn site_create(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<SiteBody>,
) -> Result<Json<SiteCreatedView>, ApiError> {
    if !validate::site_name_is_valid(&body.site_name) {
        return Err(ApiError::SiteNameRestrictions);
    }

    if state.store.find_site_by_name(&body.site_name).await?.is_some() {
        return Err(ApiError::SiteNameExists);
    }

    let site = state
        .store
        .create_site(Site::new(body.site_name, body.site_description))
        .await?;

    Ok(Json(site.into()))
}
