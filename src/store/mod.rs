// File-backed keyed record store for sites, controllers and users.
//
// The whole record set lives in one JSON file, loaded at startup and
// rewritten atomically (temp file + rename) on every mutation. Cross-request
// consistency is the store's job alone: a single RwLock guards the in-memory
// record set, readers get cloned snapshots.

pub mod models;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use models::{Controller, Site, SiteWithControllers, User, UserCredentials, ROLE_ADMINISTRATOR};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("record not found: {0}")]
    NotFound(String),
}

/// CRUD + relation loading over sites and controllers, plus the user and
/// credential lookups the login flow needs.
///
/// `site_name` uniqueness is deliberately NOT enforced here: callers
/// check-then-create, accepting the race between two concurrent creates of
/// the same name. The file store has no unique-constraint primitive.
#[async_trait]
pub trait SiteStore: Send + Sync {
    async fn create_site(&self, site: Site) -> Result<Site, StoreError>;
    async fn find_site_by_name(&self, site_name: &str) -> Result<Option<Site>, StoreError>;
    async fn site_with_controllers(&self, site_id: Uuid) -> Result<SiteWithControllers, StoreError>;
    async fn sites_with_controllers(&self) -> Result<Vec<SiteWithControllers>, StoreError>;
    async fn update_site(&self, site_id: Uuid, site: Site) -> Result<(), StoreError>;
    /// Deletes the site and every controller whose `site_id` matches.
    async fn delete_site(&self, site_id: Uuid) -> Result<(), StoreError>;

    async fn create_controller(&self, controller: Controller) -> Result<Controller, StoreError>;
    async fn update_controller(&self, controller_id: Uuid, controller: Controller) -> Result<(), StoreError>;

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn credentials_for(&self, user_id: &str) -> Result<Option<UserCredentials>, StoreError>;
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct StoreData {
    sites: Vec<Site>,
    controllers: Vec<Controller>,
    users: Vec<User>,
    credentials: Vec<UserCredentials>,
}

pub struct FileStore {
    path: PathBuf,
    data: RwLock<StoreData>,
}

impl FileStore {
    /// Open the store file, or seed a fresh one with the administrative
    /// identity and its credential record on first boot.
    pub async fn open(path: impl AsRef<Path>, default_admin_password: &str) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let data = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read(&path).await?;
            let data: StoreData = serde_json::from_slice(&raw)?;
            tracing::info!(path = %path.display(), "store loaded");
            data
        } else {
            let data = Self::seed(default_admin_password);
            Self::write_file(&path, &data).await?;
            tracing::info!(path = %path.display(), "store initialized");
            data
        };
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn seed(default_admin_password: &str) -> StoreData {
        let admin = User {
            id: "admin".to_string(),
            username: "admin".to_string(),
            role: ROLE_ADMINISTRATOR.to_string(),
        };
        let credentials = UserCredentials {
            id: Uuid::new_v4(),
            user_id: admin.id.clone(),
            password: crate::auth::hash_password(default_admin_password),
        };
        StoreData {
            users: vec![admin],
            credentials: vec![credentials],
            ..StoreData::default()
        }
    }

    async fn write_file(path: &Path, data: &StoreData) -> Result<(), StoreError> {
        let serialized = serde_json::to_vec_pretty(data)?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, &serialized).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn persist(&self, data: &StoreData) -> Result<(), StoreError> {
        if let Err(e) = Self::write_file(&self.path, data).await {
            tracing::error!(path = %self.path.display(), error = %e, "store write failed");
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl SiteStore for FileStore {
    async fn create_site(&self, site: Site) -> Result<Site, StoreError> {
        let mut data = self.data.write().await;
        data.sites.push(site.clone());
        self.persist(&data).await?;
        Ok(site)
    }

    async fn find_site_by_name(&self, site_name: &str) -> Result<Option<Site>, StoreError> {
        let data = self.data.read().await;
        Ok(data.sites.iter().find(|s| s.site_name == site_name).cloned())
    }

    async fn site_with_controllers(&self, site_id: Uuid) -> Result<SiteWithControllers, StoreError> {
        let data = self.data.read().await;
        let site = data
            .sites
            .iter()
            .find(|s| s.site_id == site_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("site {site_id}")))?;
        let controllers = data
            .controllers
            .iter()
            .filter(|c| c.site_id == site_id)
            .cloned()
            .collect();
        Ok(SiteWithControllers { site, controllers })
    }

    async fn sites_with_controllers(&self) -> Result<Vec<SiteWithControllers>, StoreError> {
        let data = self.data.read().await;
        Ok(data
            .sites
            .iter()
            .map(|site| SiteWithControllers {
                site: site.clone(),
                controllers: data
                    .controllers
                    .iter()
                    .filter(|c| c.site_id == site.site_id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    async fn update_site(&self, site_id: Uuid, site: Site) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        let slot = data
            .sites
            .iter_mut()
            .find(|s| s.site_id == site_id)
            .ok_or_else(|| StoreError::NotFound(format!("site {site_id}")))?;
        // site_id is immutable; keep the stored one regardless of input.
        let mut site = site;
        site.site_id = site_id;
        let new_name = site.site_name.clone();
        *slot = site;
        // Keep the denormalized siteName on owned controllers in sync.
        for controller in data.controllers.iter_mut().filter(|c| c.site_id == site_id) {
            controller.site_name = new_name.clone();
        }
        self.persist(&data).await
    }

    async fn delete_site(&self, site_id: Uuid) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        if !data.sites.iter().any(|s| s.site_id == site_id) {
            return Err(StoreError::NotFound(format!("site {site_id}")));
        }
        data.controllers.retain(|c| c.site_id != site_id);
        data.sites.retain(|s| s.site_id != site_id);
        self.persist(&data).await
    }

    async fn create_controller(&self, mut controller: Controller) -> Result<Controller, StoreError> {
        controller.reset_derived();
        let mut data = self.data.write().await;
        data.controllers.push(controller.clone());
        self.persist(&data).await?;
        Ok(controller)
    }

    async fn update_controller(&self, controller_id: Uuid, mut controller: Controller) -> Result<(), StoreError> {
        controller.reset_derived();
        let mut data = self.data.write().await;
        let slot = data
            .controllers
            .iter_mut()
            .find(|c| c.controller_id == controller_id)
            .ok_or_else(|| StoreError::NotFound(format!("controller {controller_id}")))?;
        controller.controller_id = controller_id;
        *slot = controller;
        self.persist(&data).await
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|u| u.username == username).cloned())
    }

    async fn credentials_for(&self, user_id: &str) -> Result<Option<UserCredentials>, StoreError> {
        let data = self.data.read().await;
        Ok(data.credentials.iter().find(|c| c.user_id == user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(site: &Site, name: &str) -> Controller {
        Controller {
            controller_id: Uuid::new_v4(),
            site_id: site.site_id,
            site_name: site.site_name.clone(),
            controller_name: name.to_string(),
            ip_address: "10.0.0.1".to_string(),
            login_account: "karaf".to_string(),
            login_password: "karaf".to_string(),
            description: None,
            cluster_nodes: vec![],
            login_status: None,
            cpu_idle: None,
            ram_usage: None,
            device_counts: None,
            available_device_counts: None,
            error_log: None,
        }
    }

    async fn open_temp() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json"), "changeme")
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn seeds_admin_identity_on_first_boot() {
        let (_dir, store) = open_temp().await;
        let admin = store.find_user("admin").await.unwrap().unwrap();
        assert!(admin.is_administrator());
        let creds = store.credentials_for(&admin.id).await.unwrap().unwrap();
        assert_eq!(creds.password, crate::auth::hash_password("changeme"));
    }

    #[tokio::test]
    async fn site_round_trip_with_empty_controllers() {
        let (_dir, store) = open_temp().await;
        let site = store
            .create_site(Site::new("PlantA".to_string(), Some("desc".to_string())))
            .await
            .unwrap();
        let loaded = store.site_with_controllers(site.site_id).await.unwrap();
        assert_eq!(loaded.site.site_name, "PlantA");
        assert_eq!(loaded.site.site_description.as_deref(), Some("desc"));
        assert!(loaded.controllers.is_empty());
    }

    #[tokio::test]
    async fn delete_site_cascades_to_controllers() {
        let (_dir, store) = open_temp().await;
        let a = store.create_site(Site::new("PlantA".to_string(), None)).await.unwrap();
        let b = store.create_site(Site::new("PlantB".to_string(), None)).await.unwrap();
        store.create_controller(controller(&a, "ctrl-a1")).await.unwrap();
        store.create_controller(controller(&a, "ctrl-a2")).await.unwrap();
        let kept = store.create_controller(controller(&b, "ctrl-b1")).await.unwrap();

        store.delete_site(a.site_id).await.unwrap();

        assert!(store.find_site_by_name("PlantA").await.unwrap().is_none());
        let remaining = store.sites_with_controllers().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].controllers.len(), 1);
        assert_eq!(remaining[0].controllers[0].controller_id, kept.controller_id);
    }

    #[tokio::test]
    async fn writes_strip_derived_fields() {
        let (_dir, store) = open_temp().await;
        let site = store.create_site(Site::new("PlantA".to_string(), None)).await.unwrap();
        let mut c = controller(&site, "ctrl-1");
        c.login_status = Some("connected".to_string());
        c.cpu_idle = Some(88.0);
        c.error_log = Some(vec!["boom".to_string()]);
        let created = store.create_controller(c).await.unwrap();
        assert!(!created.has_derived());

        let loaded = store.site_with_controllers(site.site_id).await.unwrap();
        assert!(!loaded.controllers[0].has_derived());
    }

    #[tokio::test]
    async fn rename_updates_denormalized_controller_site_name() {
        let (_dir, store) = open_temp().await;
        let site = store.create_site(Site::new("PlantA".to_string(), None)).await.unwrap();
        store.create_controller(controller(&site, "ctrl-1")).await.unwrap();

        let mut renamed = site.clone();
        renamed.site_name = "PlantB".to_string();
        store.update_site(site.site_id, renamed).await.unwrap();

        let loaded = store.site_with_controllers(site.site_id).await.unwrap();
        assert_eq!(loaded.site.site_name, "PlantB");
        assert_eq!(loaded.controllers[0].site_name, "PlantB");
    }

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        {
            let store = FileStore::open(&path, "changeme").await.unwrap();
            store.create_site(Site::new("PlantA".to_string(), None)).await.unwrap();
        }
        let store = FileStore::open(&path, "changeme").await.unwrap();
        assert!(store.find_site_by_name("PlantA").await.unwrap().is_some());
    }
}
