use chrono::Utc;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::RemoteConfig;
use crate::store::models::Controller;

use super::paths::{self, MetricKind, DEFAULT_INTERVAL_SECS};
use super::{
    ClusterNode, ClusterNodesResponse, DevicesResponse, LogResponse, LogSourcesResponse, MarsError,
    TimeRangeSeries, Utilization,
};

/// Only lines matching this string count as error log entries.
const LOG_MATCH_STRING: &str = "error";

/// HTTP client for the device-management endpoint of a single controller at
/// a time. The controller record supplies host and login; scheme, port and
/// the per-call timeout come from deployment config.
pub struct MarsClient {
    http: reqwest::Client,
    scheme: String,
    port: u16,
    metric_window_secs: i64,
}

impl MarsClient {
    pub fn new(remote: &RemoteConfig) -> Result<Self, MarsError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(remote.timeout_secs))
            .danger_accept_invalid_certs(remote.accept_invalid_certs)
            .build()?;
        Ok(Self {
            http,
            scheme: remote.scheme.clone(),
            port: remote.port,
            metric_window_secs: remote.metric_window_secs,
        })
    }

    fn url(&self, controller: &Controller, path: &str) -> Result<Url, MarsError> {
        let full = format!(
            "{}://{}:{}{}",
            self.scheme, controller.ip_address, self.port, path
        );
        Ok(Url::parse(&full)?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        controller: &Controller,
        path: &str,
    ) -> Result<T, MarsError> {
        let url = self.url(controller, path)?;
        debug!(controller = %controller.controller_name, %url, "GET");

        let resp = self
            .http
            .get(url)
            .basic_auth(&controller.login_account, Some(&controller.login_password))
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(MarsError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| MarsError::Malformed(e.to_string()))
    }

    /// Current cluster-node membership of the controller.
    pub async fn cluster_nodes(&self, controller: &Controller) -> Result<Vec<ClusterNode>, MarsError> {
        let resp: ClusterNodesResponse = self.get_json(controller, paths::cluster_nodes()).await?;
        Ok(resp.clusters)
    }

    /// Live cpu idle / ram usage / device counts, fetched in one shot.
    ///
    /// The three sub-requests run concurrently; if any of them fails the
    /// whole snapshot fails, so callers never see a partial mix.
    pub async fn utilization(&self, controller: &Controller) -> Result<Utilization, MarsError> {
        let end = Utc::now().timestamp();
        let start = end - self.metric_window_secs;

        let cpu_path = paths::metric_status(MetricKind::Cpu, start, end, DEFAULT_INTERVAL_SECS);
        let ram_path = paths::metric_status(MetricKind::Memory, start, end, DEFAULT_INTERVAL_SECS);

        let (cpu, ram, devices): (TimeRangeSeries, TimeRangeSeries, DevicesResponse) = tokio::try_join!(
            self.get_json(controller, &cpu_path),
            self.get_json(controller, &ram_path),
            self.get_json(controller, paths::devices_status()),
        )?;

        let cpu_idle = latest_value(&cpu)
            .ok_or_else(|| MarsError::Malformed("empty cpu series".to_string()))?;
        let ram_usage = latest_value(&ram)
            .ok_or_else(|| MarsError::Malformed("empty memory series".to_string()))?;

        let device_counts = devices.devices.len() as u32;
        let available_device_counts = devices.devices.iter().filter(|d| d.available).count() as u32;

        Ok(Utilization {
            cpu_idle,
            ram_usage,
            device_counts,
            available_device_counts,
        })
    }

    /// Error-level log lines from the last `last_hours` hours, newest first,
    /// at most `log_count` entries. The source file is taken from the
    /// controller's own source listing.
    pub async fn error_log(
        &self,
        controller: &Controller,
        last_hours: u32,
        log_count: usize,
    ) -> Result<Vec<String>, MarsError> {
        let sources = self.log_source_files(controller).await?;
        let Some(source) = sources.first() else {
            return Ok(Vec::new());
        };

        let start = Utc::now().timestamp() - i64::from(last_hours) * 3600;
        let path = paths::controller_log(start, log_count, LOG_MATCH_STRING, source);
        let resp: LogResponse = self.get_json(controller, &path).await?;

        let mut logs = resp.logs;
        // The endpoint should already honor the count parameter; cap anyway.
        logs.truncate(log_count);
        Ok(logs)
    }

    /// Available log source files on the controller.
    pub async fn log_source_files(&self, controller: &Controller) -> Result<Vec<String>, MarsError> {
        let resp: LogSourcesResponse = self.get_json(controller, paths::log_source_files()).await?;
        Ok(resp.sources)
    }
}

fn latest_value(series: &TimeRangeSeries) -> Option<f64> {
    series
        .data
        .iter()
        .max_by_key(|point| point.time)
        .map(|point| point.value)
}
