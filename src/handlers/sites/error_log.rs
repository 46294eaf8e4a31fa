use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::views::SiteLogView;
use crate::AppState;

use super::{resolve_site_id, LogQuery};

/// GET /sites/errorLog (member) - controller error logs across all sites.
///
/// `hour` bounds the time window, `count` caps the entries per controller.
/// Unreachable controllers keep their slot with no log attached.
pub async fn sites_error_log(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<LogQuery>,
) -> Result<Json<Vec<SiteLogView>>, ApiError> {
    let sites = state.store.sites_with_controllers().await?;
    let sites = state
        .gateway
        .fetch_error_log_all(sites, query.hour, query.count)
        .await;

    Ok(Json(sites.into_iter().map(Into::into).collect()))
}

/// GET /sites/{siteName}/errorLog (member) - error logs for one site.
pub async fn site_error_log(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(site_name): Path<String>,
    Query(query): Query<LogQuery>,
) -> Result<Json<SiteLogView>, ApiError> {
    let site_id = resolve_site_id(state.store.as_ref(), &site_name).await?;

    let site = state.store.site_with_controllers(site_id).await?;
    let mut enriched = state
        .gateway
        .fetch_error_log_all(vec![site], query.hour, query.count)
        .await;

    let site = enriched
        .pop()
        .ok_or_else(|| ApiError::internal_server_error("enrichment dropped the site"))?;
    Ok(Json(site.into()))
}
