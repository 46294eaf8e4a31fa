// Request-path builders for the device-management endpoint.
//
// Paths are deterministic functions of typed inputs; the client joins them
// onto a per-controller base URL. Only the log source identifier needs
// percent-encoding, everything else is plain path segments.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Query-value encoding for the log source identifier. Percent-encoding,
/// not form-encoding: a space becomes %20, never '+'.
const SOURCE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Metric selector for the time-range status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Cpu,
    Memory,
    Disk,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Memory => "memory",
            MetricKind::Disk => "disk",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_INTERVAL_SECS: u32 = 30;

/// Time-range cpu/memory/disk status for the controller itself.
pub fn metric_status(kind: MetricKind, start_time: i64, end_time: i64, interval_secs: u32) -> String {
    format!("/mars/analyzer/v1/timerangebar_all/ctrl/{kind}/{start_time}/{end_time}/{interval_secs}")
}

/// Devices currently known to the controller.
pub fn devices_status() -> &'static str {
    "/mars/v1/devices"
}

/// Cluster-node membership of the controller.
pub fn cluster_nodes() -> &'static str {
    "/mars/v1/cluster"
}

/// Log retrieval: start time, entry cap, match string, and the source file
/// identifier, which may contain slashes and must be percent-encoded.
pub fn controller_log(start_time: i64, total_count: usize, match_string: &str, file_source: &str) -> String {
    let encoded_source = utf8_percent_encode(file_source, SOURCE_ENCODE_SET);
    format!(
        "/mars/utility/logs/v1/controller?start={start_time}&number={total_count}&match={match_string}&source={encoded_source}"
    )
}

/// Listing of available log source files.
pub fn log_source_files() -> &'static str {
    "/mars/utility/logs/v1/source_files"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_status_path_template() {
        assert_eq!(
            metric_status(MetricKind::Cpu, 1700000000, 1700000300, 30),
            "/mars/analyzer/v1/timerangebar_all/ctrl/cpu/1700000000/1700000300/30"
        );
        assert_eq!(
            metric_status(MetricKind::Memory, 0, 60, DEFAULT_INTERVAL_SECS),
            "/mars/analyzer/v1/timerangebar_all/ctrl/memory/0/60/30"
        );
    }

    #[test]
    fn log_path_percent_encodes_source() {
        let path = controller_log(1700000000, 50, "error", "/var/log/karaf.log");
        assert_eq!(
            path,
            "/mars/utility/logs/v1/controller?start=1700000000&number=50&match=error&source=%2Fvar%2Flog%2Fkaraf.log"
        );
    }

    #[test]
    fn log_path_encodes_spaces_as_percent_twenty() {
        let path = controller_log(0, 1, "error", "/var/log/karaf 2.log");
        assert!(
            path.ends_with("&source=%2Fvar%2Flog%2Fkaraf%202.log"),
            "unexpected path: {path}"
        );
    }

    #[test]
    fn fixed_paths() {
        assert_eq!(devices_status(), "/mars/v1/devices");
        assert_eq!(cluster_nodes(), "/mars/v1/cluster");
        assert_eq!(log_source_files(), "/mars/utility/logs/v1/source_files");
    }
}
