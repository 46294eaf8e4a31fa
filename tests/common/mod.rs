// Shared helpers: an app wired against a temp store and a configurable
// remote port, driven through the router with oneshot requests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use mars_middle::auth::{generate_jwt, Claims};
use mars_middle::config::RemoteConfig;
use mars_middle::gateway::Gateway;
use mars_middle::mars::MarsClient;
use mars_middle::store::models::{Controller, Site, ROLE_ADMINISTRATOR, ROLE_MEMBER};
use mars_middle::store::{FileStore, SiteStore};
use mars_middle::AppState;

pub const TEST_ADMIN_PASSWORD: &str = "admin";

pub struct TestApp {
    pub state: AppState,
    _dir: tempfile::TempDir,
}

/// Build an app whose remote client talks to `http://<controller ip>:<remote_port>`.
/// Point controller records at 127.0.0.1 to reach a wiremock server bound to
/// that port; 127.0.0.2 refuses connections, standing in for an unreachable
/// controller.
pub async fn test_app(remote_port: u16) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::open(dir.path().join("store.json"), TEST_ADMIN_PASSWORD)
        .await
        .expect("store");
    let remote = RemoteConfig {
        scheme: "http".to_string(),
        port: remote_port,
        timeout_secs: 2,
        metric_window_secs: 300,
        accept_invalid_certs: false,
    };
    let client = MarsClient::new(&remote).expect("client");
    TestApp {
        state: AppState::new(Arc::new(store), Gateway::new(client)),
        _dir: dir,
    }
}

pub fn admin_token() -> String {
    generate_jwt(Claims::new("admin".to_string(), ROLE_ADMINISTRATOR.to_string())).expect("token")
}

pub fn member_token() -> String {
    generate_jwt(Claims::new("viewer".to_string(), ROLE_MEMBER.to_string())).expect("token")
}

pub async fn request(
    state: &AppState,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let app = mars_middle::app(state.clone());

    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        // Framework-level rejections (e.g. axum's Query extractor) emit
        // plain-text bodies; surface them as a JSON string so status-only
        // assertions still run.
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub async fn seed_site(state: &AppState, name: &str, description: Option<&str>) -> Site {
    state
        .store
        .create_site(Site::new(name.to_string(), description.map(str::to_string)))
        .await
        .expect("seed site")
}

pub async fn seed_controller(state: &AppState, site: &Site, name: &str, host: &str) -> Controller {
    state
        .store
        .create_controller(Controller {
            controller_id: Uuid::new_v4(),
            site_id: site.site_id,
            site_name: site.site_name.clone(),
            controller_name: name.to_string(),
            ip_address: host.to_string(),
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
        })
        .await
        .expect("seed controller")
}
