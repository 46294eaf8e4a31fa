// Read-time aggregation gateway.
//
// Orchestrates per-controller calls to the device-management endpoint and
// merges the results into the in-memory site/controller tree. Enrichment is
// fail-soft: one unreachable controller becomes a sentinel entry, never an
// error, so a fleet-wide listing always returns one entry per controller.
//
// The gateway never writes to the store. Cluster refresh returns updated
// controller values; persisting them is the caller's decision.

pub mod fanout;

use tracing::warn;

use crate::mars::{MarsClient, MarsError};
use crate::store::models::{Controller, SiteWithControllers};

pub const LOGIN_STATUS_CONNECTED: &str = "connected";
pub const LOGIN_STATUS_UNREACHABLE: &str = "unreachable";

pub struct Gateway {
    client: MarsClient,
}

impl Gateway {
    pub fn new(client: MarsClient) -> Self {
        Self { client }
    }

    /// Refresh last-known cluster membership from the controller.
    ///
    /// Advisory and best-effort: on failure the previous membership stays in
    /// place. Returns the (possibly updated) controller value; callers
    /// persist it when the membership actually changed.
    pub async fn refresh_cluster_membership(&self, mut controller: Controller) -> Controller {
        match self.client.cluster_nodes(&controller).await {
            Ok(nodes) => {
                controller.cluster_nodes = nodes.into_iter().map(|n| n.ip).collect();
            }
            Err(e) => self.log_soft_failure(&controller, "cluster refresh", &e),
        }
        controller
    }

    /// Populate the five utilization-derived fields from the remote status
    /// endpoint. Either all five are set, or all numeric fields stay unknown
    /// and `login_status` reads "unreachable". Never returns an error.
    pub async fn enrich_utilization(&self, mut controller: Controller) -> Controller {
        match self.client.utilization(&controller).await {
            Ok(live) => {
                controller.login_status = Some(LOGIN_STATUS_CONNECTED.to_string());
                controller.cpu_idle = Some(live.cpu_idle);
                controller.ram_usage = Some(live.ram_usage);
                controller.device_counts = Some(live.device_counts);
                controller.available_device_counts = Some(live.available_device_counts);
            }
            Err(e) => {
                self.log_soft_failure(&controller, "utilization", &e);
                controller.login_status = Some(LOGIN_STATUS_UNREACHABLE.to_string());
                controller.cpu_idle = None;
                controller.ram_usage = None;
                controller.device_counts = None;
                controller.available_device_counts = None;
            }
        }
        controller
    }

    /// Populate `error_log` with at most `log_count` entries from the last
    /// `last_hours` hours. Same fail-soft contract as utilization.
    pub async fn fetch_error_log(
        &self,
        mut controller: Controller,
        last_hours: u32,
        log_count: usize,
    ) -> Controller {
        match self.client.error_log(&controller, last_hours, log_count).await {
            Ok(logs) => {
                controller.error_log = Some(logs);
            }
            Err(e) => {
                self.log_soft_failure(&controller, "error log", &e);
                controller.error_log = None;
            }
        }
        controller
    }

    /// Cluster refresh across a set of sites: sites fan out concurrently and
    /// each site's controllers fan out concurrently below that. The barrier
    /// waits for every controller of every site to resolve.
    pub async fn refresh_cluster_membership_all(
        &self,
        sites: Vec<SiteWithControllers>,
    ) -> Vec<SiteWithControllers> {
        fanout::join_all_ordered(sites, |mut site| async move {
            site.controllers = fanout::join_all_ordered(site.controllers, |controller| {
                self.refresh_cluster_membership(controller)
            })
            .await;
            site
        })
        .await
    }

    /// Utilization enrichment across a set of sites, same fan-out shape.
    pub async fn enrich_utilization_all(
        &self,
        sites: Vec<SiteWithControllers>,
    ) -> Vec<SiteWithControllers> {
        fanout::join_all_ordered(sites, |mut site| async move {
            site.controllers =
                fanout::join_all_ordered(site.controllers, |controller| self.enrich_utilization(controller))
                    .await;
            site
        })
        .await
    }

    /// Error-log enrichment across a set of sites, same fan-out shape.
    pub async fn fetch_error_log_all(
        &self,
        sites: Vec<SiteWithControllers>,
        last_hours: u32,
        log_count: usize,
    ) -> Vec<SiteWithControllers> {
        fanout::join_all_ordered(sites, |mut site| async move {
            site.controllers = fanout::join_all_ordered(site.controllers, |controller| {
                self.fetch_error_log(controller, last_hours, log_count)
            })
            .await;
            site
        })
        .await
    }

    fn log_soft_failure(&self, controller: &Controller, operation: &str, error: &MarsError) {
        warn!(
            controller = %controller.controller_name,
            ip = %controller.ip_address,
            %error,
            "{operation} failed, continuing with prior/unknown state"
        );
    }
}
