//! Analysis service connection settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Local development endpoint of the analysis service.
fn default_base_url() -> String {
    String::from("http://localhost:8000")
}

fn default_path_prefix() -> String {
    String::from("/api/v1")
}

/// Analysis runs call an LLM upstream and routinely take tens of seconds.
const fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Scheme, host and port of the analysis service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path prefix the service mounts its routes under.
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path_prefix: default_path_prefix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Full URL of a service route, e.g. `endpoint("analyze")`.
    ///
    /// Slashes between the base URL, the prefix and the route are normalized
    /// so `http://host/` + `api/v1/` + `/chat` yields `http://host/api/v1/chat`.
    #[must_use]
    pub fn endpoint(&self, route: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.path_prefix.trim_matches('/');
        let route = route.trim_start_matches('/');
        if prefix.is_empty() {
            format!("{base}/{route}")
        } else {
            format!("{base}/{prefix}/{route}")
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject settings the transport cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty or non-HTTP base URL
    /// or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".into(),
                reason: "must not be empty".into(),
            });
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".into(),
                reason: format!("'{base}' is not an http(s) URL"),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
