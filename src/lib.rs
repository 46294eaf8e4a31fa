pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod mars;
pub mod middleware;
pub mod store;
pub mod validate;
pub mod views;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use gateway::Gateway;
use store::SiteStore;

/// Collaborators wired once at process start and handed to every handler.
/// Explicit constructor injection; no service registry.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SiteStore>,
    pub gateway: Arc<Gateway>,
}

impl AppState {
    pub fn new(store: Arc<dyn SiteStore>, gateway: Gateway) -> Self {
        Self {
            store,
            gateway: Arc::new(gateway),
        }
    }
}

/// Route table. Auth tier per route is declared by the handler's extractor:
/// `AuthUser` = member, `AdminUser` = admin, neither = public.
pub fn app(state: AppState) -> Router {
    use handlers::{public, sites};

    Router::new()
        // Public
        .route("/health", get(health))
        .route("/users/login", post(public::login_post))
        // Sites: GET = member, POST = admin
        .route("/sites", get(sites::site_list).post(sites::site_create))
        // Static segment must be registered alongside the :siteName capture
        .route("/sites/errorLog", get(sites::sites_error_log))
        .route(
            "/sites/:site_name",
            get(sites::site_show)
                .put(sites::site_update)
                .delete(sites::site_delete),
        )
        .route("/sites/:site_name/errorLog", get(sites::site_error_log))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now(),
    }))
}
