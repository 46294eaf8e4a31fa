use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub security: SecurityConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON record file; created and seeded on first boot.
    pub path: String,
    pub default_admin_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

/// How to reach each controller's device-management endpoint. The host comes
/// from the controller record; scheme and port are deployment-wide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub scheme: String,
    pub port: u16,
    /// Bounded per-call timeout. The upstream design had none; every remote
    /// call here times out rather than hanging a whole listing.
    pub timeout_secs: u64,
    /// Sample window in seconds for cpu/memory time-range queries.
    pub metric_window_secs: i64,
    /// Skip TLS certificate verification. Controllers commonly ship
    /// self-signed certs, but the choice is a deployment decision, never
    /// implied by the scheme.
    pub accept_invalid_certs: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("SERVER_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("STORE_PATH") {
            self.store.path = v;
        }
        if let Ok(v) = env::var("STORE_DEFAULT_ADMIN_PASSWORD") {
            self.store.default_admin_password = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("REMOTE_SCHEME") {
            self.remote.scheme = v;
        }
        if let Ok(v) = env::var("REMOTE_PORT") {
            self.remote.port = v.parse().unwrap_or(self.remote.port);
        }
        if let Ok(v) = env::var("REMOTE_TIMEOUT_SECS") {
            self.remote.timeout_secs = v.parse().unwrap_or(self.remote.timeout_secs);
        }
        if let Ok(v) = env::var("REMOTE_METRIC_WINDOW_SECS") {
            self.remote.metric_window_secs = v.parse().unwrap_or(self.remote.metric_window_secs);
        }
        if let Ok(v) = env::var("REMOTE_ACCEPT_INVALID_CERTS") {
            self.remote.accept_invalid_certs = v.parse().unwrap_or(self.remote.accept_invalid_certs);
        }
        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            store: StoreConfig {
                path: "database/memory-db.json".to_string(),
                default_admin_password: "admin".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: "dev-only-secret".to_string(),
                jwt_expiry_hours: 24 * 7,
            },
            remote: RemoteConfig {
                scheme: "http".to_string(),
                port: 8181,
                timeout_secs: 10,
                metric_window_secs: 300,
                accept_invalid_certs: false,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            store: StoreConfig {
                path: "database/memory-db.json".to_string(),
                default_admin_password: "admin".to_string(),
            },
            security: SecurityConfig {
                // Must be overridden via SECURITY_JWT_SECRET in production.
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
            },
            remote: RemoteConfig {
                scheme: "https".to_string(),
                port: 8181,
                timeout_secs: 10,
                metric_window_secs: 300,
                // Self-signed appliance certs; opt back in to verification
                // with REMOTE_ACCEPT_INVALID_CERTS=false.
                accept_invalid_certs: true,
            },
        }
    }
}

// Global singleton config, initialized once at startup.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.remote.timeout_secs, 10);
        assert!(!config.remote.accept_invalid_certs);
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn production_requires_secret_override() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.jwt_expiry_hours, 4);
        assert!(config.remote.accept_invalid_certs);
    }
}
