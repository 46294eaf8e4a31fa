// Site routes: inventory CRUD plus the enriched read paths.
//
// Reads follow the same two-pass shape: load the site tree, refresh cluster
// membership (persisting changes), re-read, then enrich utilization. The two
// passes are deliberately non-atomic; each request re-fetches from scratch.

mod create;
mod delete;
mod error_log;
mod list;
mod show;
mod update;

pub use create::site_create;
pub use delete::site_delete;
pub use error_log::{site_error_log, sites_error_log};
pub use list::site_list;
pub use show::site_show;
pub use update::site_update;

use std::collections::HashMap;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::models::SiteWithControllers;
use crate::store::SiteStore;
use crate::AppState;

/// Request body for POST and PUT /sites.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteBody {
    pub site_name: String,
    #[serde(default)]
    pub site_description: Option<String>,
}

/// Query parameters for the errorLog routes. Both are required.
#[derive(Debug, Deserialize)]
pub struct LogQuery {
    /// Get log from the last N hours.
    pub hour: u32,
    /// History entry count of log.
    pub count: usize,
}

pub(crate) async fn resolve_site_id(store: &dyn SiteStore, site_name: &str) -> Result<Uuid, ApiError> {
    store
        .find_site_by_name(site_name)
        .await?
        .map(|site| site.site_id)
        .ok_or(ApiError::SiteNotFound)
}

/// First read pass: refresh cluster membership for every controller and
/// write back the records whose membership changed. Soft failures keep the
/// previous value, so they never produce a write.
pub(crate) async fn refresh_and_persist_clusters(
    state: &AppState,
    sites: Vec<SiteWithControllers>,
) -> Result<(), ApiError> {
    let before: HashMap<Uuid, Vec<String>> = sites
        .iter()
        .flat_map(|site| {
            site.controllers
                .iter()
                .map(|c| (c.controller_id, c.cluster_nodes.clone()))
        })
        .collect();

    let refreshed = state.gateway.refresh_cluster_membership_all(sites).await;

    for site in refreshed {
        for controller in site.controllers {
            if before.get(&controller.controller_id) != Some(&controller.cluster_nodes) {
                state
                    .store
                    .update_controller(controller.controller_id, controller)
                    .await?;
            }
        }
    }
    Ok(())
}
