use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical site owning zero or more controllers.
///
/// `site_id` is generated at create time and never changes. `site_name` is
/// the external identifier used in URLs; uniqueness is checked by the API
/// layer before create/rename.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub site_id: Uuid,
    pub site_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_description: Option<String>,
}

impl Site {
    pub fn new(site_name: String, site_description: Option<String>) -> Self {
        Self {
            site_id: Uuid::new_v4(),
            site_name,
            site_description,
        }
    }
}

/// A managed device belonging to exactly one site.
///
/// The first block of fields is static configuration persisted by the store.
/// `cluster_nodes` is the last-known cluster membership, rewritten whenever
/// a cluster refresh sees a different node list. Everything after that is
/// derived per-request from the remote device endpoint and must never be
/// persisted; the store clears those fields on every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Controller {
    pub controller_id: Uuid,
    pub site_id: Uuid,
    pub site_name: String,
    pub controller_name: String,
    pub ip_address: String,
    pub login_account: String,
    pub login_password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub cluster_nodes: Vec<String>,

    // Derived per-request, ephemeral view state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_idle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_counts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_device_counts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_log: Option<Vec<String>>,
}

impl Controller {
    /// Clear all request-time derived fields. Called by the store before any
    /// write so that stale live status never ends up on disk.
    pub fn reset_derived(&mut self) {
        self.login_status = None;
        self.cpu_idle = None;
        self.ram_usage = None;
        self.device_counts = None;
        self.available_device_counts = None;
        self.error_log = None;
    }

    /// True if any derived field is populated.
    pub fn has_derived(&self) -> bool {
        self.login_status.is_some()
            || self.cpu_idle.is_some()
            || self.ram_usage.is_some()
            || self.device_counts.is_some()
            || self.available_device_counts.is_some()
            || self.error_log.is_some()
    }
}

/// A site together with its controllers, as loaded by a relation-including
/// read. Never persisted in this shape.
#[derive(Debug, Clone)]
pub struct SiteWithControllers {
    pub site: Site,
    pub controllers: Vec<Controller>,
}

pub const ROLE_ADMINISTRATOR: &str = "administrator";
pub const ROLE_MEMBER: &str = "member";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: String,
}

impl User {
    pub fn is_administrator(&self) -> bool {
        self.role == ROLE_ADMINISTRATOR
    }
}

/// Credential record for a user: hex sha256 digest of the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCredentials {
    pub id: Uuid,
    pub user_id: String,
    pub password: String,
}
