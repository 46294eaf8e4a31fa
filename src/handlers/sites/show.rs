use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::views::SiteStatusView;
use crate::AppState;

use super::{refresh_and_persist_clusters, resolve_site_id};

/// GET /sites/{siteName} (member) - one site with live controller status.
pub async fn site_show(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(site_name): Path<String>,
) -> Result<Json<SiteStatusView>, ApiError> {
    let site_id = resolve_site_id(state.store.as_ref(), &site_name).await?;

    let site = state.store.site_with_controllers(site_id).await?;
    refresh_and_persist_clusters(&state, vec![site]).await?;

    let site = state.store.site_with_controllers(site_id).await?;
    let mut enriched = state.gateway.enrich_utilization_all(vec![site]).await;

    // One input site always yields exactly one output site.
    let site = enriched
        .pop()
        .ok_or_else(|| ApiError::internal_server_error("enrichment dropped the site"))?;
    Ok(Json(site.into()))
}
