// Client for the per-controller device-management endpoint.
//
// Stateless: one call per remote capability, no retries, no caching. Every
// failure mode (transport, timeout, non-2xx, malformed body) surfaces as a
// `MarsError`; the gateway decides what a failure means for the response.

pub mod client;
pub mod paths;

pub use client::MarsClient;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarsError {
    #[error("remote transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote returned HTTP {status}")]
    Status { status: u16 },
    #[error("remote response malformed: {0}")]
    Malformed(String),
    #[error("invalid remote URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// One member of the controller's cluster.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNode {
    pub id: String,
    pub ip: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClusterNodesResponse {
    pub clusters: Vec<ClusterNode>,
}

/// One sample of a time-range metric series.
#[derive(Debug, Clone, Deserialize)]
pub struct TimePoint {
    pub time: i64,
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimeRangeSeries {
    pub data: Vec<TimePoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DeviceStatus {
    #[allow(dead_code)]
    pub id: String,
    pub available: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DevicesResponse {
    pub devices: Vec<DeviceStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LogResponse {
    pub logs: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LogSourcesResponse {
    pub sources: Vec<String>,
}

/// Live cpu/ram/device snapshot for one controller. All fields are read in
/// one client call so the caller either gets the full set or an error.
#[derive(Debug, Clone)]
pub struct Utilization {
    pub cpu_idle: f64,
    pub ram_usage: f64,
    pub device_counts: u32,
    pub available_device_counts: u32,
}
