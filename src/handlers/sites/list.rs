use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::views::SiteStatusView;
use crate::AppState;

use super::refresh_and_persist_clusters;

/// GET /sites (member) - every site with live controller status.
///
/// Cluster refresh first, persisting membership changes, then a fresh read
/// and utilization enrichment. An unreachable controller shows up as one
/// "unreachable" entry; it never fails the listing.
pub async fn site_list(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<SiteStatusView>>, ApiError> {
    let sites = state.store.sites_with_controllers().await?;
    refresh_and_persist_clusters(&state, sites).await?;

    let sites = state.store.sites_with_controllers().await?;
    let sites = state.gateway.enrich_utilization_all(sites).await;

    Ok(Json(sites.into_iter().map(Into::into).collect()))
}
