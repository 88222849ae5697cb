//! Environment-driven configuration.
//!
//! Every knob has a default suitable for local development; deployment
//! overrides them through `SITESHIFT_*` variables. Clients built from
//! these settings are constructed once at process start and passed into
//! services explicitly — there is no global registry.

use std::env;
use std::time::Duration;

/// Store connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Backend URL, `protocol://host:port`
    pub url: String,
    /// Collection holding project documents
    pub projects_index: String,
    /// Collection holding crew documents
    pub brigades_index: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Per-request timeout applied by the backend client
    pub request_timeout: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:9200".into(),
            projects_index: "projects".into(),
            brigades_index: "brigades".into(),
            username: None,
            password: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Process-wide settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub store: StoreSettings,
    pub engine: EngineSettings,
}

/// Engine tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Write attempts per document before surfacing a transient failure
    pub max_write_attempts: u32,
    /// Cap on documents per scope query
    pub query_size: usize,
    /// Default log filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_write_attempts: 3,
            query_size: 100,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    /// Read settings from the environment, falling back to defaults
    #[must_use]
    pub fn from_env() -> Self {
        let store_defaults = StoreSettings::default();
        let engine_defaults = EngineSettings::default();
        Self {
            store: StoreSettings {
                url: env_or("SITESHIFT_STORE_URL", &store_defaults.url),
                projects_index: env_or("SITESHIFT_PROJECTS_INDEX", &store_defaults.projects_index),
                brigades_index: env_or("SITESHIFT_BRIGADES_INDEX", &store_defaults.brigades_index),
                username: env::var("SITESHIFT_STORE_USERNAME").ok(),
                password: env::var("SITESHIFT_STORE_PASSWORD").ok(),
                request_timeout: Duration::from_secs(parsed_env(
                    "SITESHIFT_STORE_TIMEOUT_SECS",
                    store_defaults.request_timeout.as_secs(),
                )),
            },
            engine: EngineSettings {
                max_write_attempts: parsed_env(
                    "SITESHIFT_WRITE_ATTEMPTS",
                    engine_defaults.max_write_attempts,
                ),
                query_size: parsed_env("SITESHIFT_QUERY_SIZE", engine_defaults.query_size),
                log_filter: env_or("SITESHIFT_LOG", &engine_defaults.log_filter),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.engine.max_write_attempts, 3);
        assert_eq!(settings.store.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.store.projects_index, "projects");
    }

    #[test]
    fn from_env_falls_back_on_unset_keys() {
        // Test processes do not set SITESHIFT_* variables.
        let settings = Settings::from_env();
        assert_eq!(settings.engine.query_size, 100);
    }
}
