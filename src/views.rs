// Per-route response shapes.
//
// Routes never serialize store models directly: each route has an explicit
// view struct that names exactly the fields it exposes. The status views
// omit identifiers and credentials; the log views additionally omit the
// descriptive and utilization fields.

use serde::Serialize;

use crate::store::models::{Controller, Site, SiteWithControllers};

/// Site as returned by POST /sites. `site_id` stays internal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteCreatedView {
    pub site_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_description: Option<String>,
}

impl From<Site> for SiteCreatedView {
    fn from(site: Site) -> Self {
        Self {
            site_name: site.site_name,
            site_description: site.site_description,
        }
    }
}

/// Site with live controller status, for GET /sites and GET /sites/{name}.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteStatusView {
    pub site_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_description: Option<String>,
    pub controllers: Vec<ControllerStatusView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerStatusView {
    pub controller_name: String,
    pub ip_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cluster_nodes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_idle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram_usage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_counts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_device_counts: Option<u32>,
}

impl From<Controller> for ControllerStatusView {
    fn from(c: Controller) -> Self {
        Self {
            controller_name: c.controller_name,
            ip_address: c.ip_address,
            description: c.description,
            cluster_nodes: c.cluster_nodes,
            login_status: c.login_status,
            cpu_idle: c.cpu_idle,
            ram_usage: c.ram_usage,
            device_counts: c.device_counts,
            available_device_counts: c.available_device_counts,
        }
    }
}

impl From<SiteWithControllers> for SiteStatusView {
    fn from(s: SiteWithControllers) -> Self {
        Self {
            site_name: s.site.site_name,
            site_description: s.site.site_description,
            controllers: s.controllers.into_iter().map(Into::into).collect(),
        }
    }
}

/// Site with controller error logs, for the errorLog routes. No site
/// description, no utilization fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteLogView {
    pub site_name: String,
    pub controllers: Vec<ControllerLogView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerLogView {
    pub controller_name: String,
    pub ip_address: String,
    pub cluster_nodes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_log: Option<Vec<String>>,
}

impl From<Controller> for ControllerLogView {
    fn from(c: Controller) -> Self {
        Self {
            controller_name: c.controller_name,
            ip_address: c.ip_address,
            cluster_nodes: c.cluster_nodes,
            error_log: c.error_log,
        }
    }
}

impl From<SiteWithControllers> for SiteLogView {
    fn from(s: SiteWithControllers) -> Self {
        Self {
            site_name: s.site.site_name,
            controllers: s.controllers.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn fixture() -> SiteWithControllers {
        let site = Site {
            site_id: Uuid::new_v4(),
            site_name: "PlantA".to_string(),
            site_description: Some("desc".to_string()),
        };
        let controller = Controller {
            controller_id: Uuid::new_v4(),
            site_id: site.site_id,
            site_name: site.site_name.clone(),
            controller_name: "ctrl-1".to_string(),
            ip_address: "10.0.0.1".to_string(),
            login_account: "karaf".to_string(),
            login_password: "secret".to_string(),
            description: Some("primary".to_string()),
            cluster_nodes: vec!["10.0.0.1".to_string()],
            login_status: Some("connected".to_string()),
            cpu_idle: Some(90.0),
            ram_usage: Some(40.0),
            device_counts: Some(8),
            available_device_counts: Some(7),
            error_log: Some(vec!["line".to_string()]),
        };
        SiteWithControllers {
            site,
            controllers: vec![controller],
        }
    }

    #[test]
    fn status_view_hides_internal_fields() {
        let value = serde_json::to_value(SiteStatusView::from(fixture())).unwrap();
        assert!(value.get("siteId").is_none());
        assert_eq!(value["siteName"], "PlantA");
        assert_eq!(value["siteDescription"], "desc");

        let controller = &value["controllers"][0];
        for hidden in ["siteName", "controllerId", "loginAccount", "loginPassword", "errorLog"] {
            assert!(controller.get(hidden).is_none(), "{hidden} should be hidden");
        }
        assert_eq!(controller["cpuIdle"], 90.0);
        assert_eq!(controller["loginStatus"], "connected");
    }

    #[test]
    fn log_view_hides_description_and_utilization() {
        let value = serde_json::to_value(SiteLogView::from(fixture())).unwrap();
        assert!(value.get("siteDescription").is_none());
        assert_eq!(value["siteName"], "PlantA");

        let controller = &value["controllers"][0];
        for hidden in [
            "description",
            "loginStatus",
            "cpuIdle",
            "ramUsage",
            "deviceCounts",
            "availableDeviceCounts",
            "loginPassword",
            "controllerId",
        ] {
            assert!(controller.get(hidden).is_none(), "{hidden} should be hidden");
        }
        assert_eq!(controller["errorLog"][0], "line");
    }

    #[test]
    fn unknown_status_serializes_without_numeric_fields() {
        let mut fixture = fixture();
        let c = &mut fixture.controllers[0];
        c.login_status = Some("unreachable".to_string());
        c.cpu_idle = None;
        c.ram_usage = None;
        c.device_counts = None;
        c.available_device_counts = None;

        let value = serde_json::to_value(SiteStatusView::from(fixture)).unwrap();
        let controller = &value["controllers"][0];
        assert_eq!(controller["loginStatus"], "unreachable");
        for absent in ["cpuIdle", "ramUsage", "deviceCounts", "availableDeviceCounts"] {
            assert!(controller.get(absent).is_none(), "{absent} should be absent");
        }
    }
}
