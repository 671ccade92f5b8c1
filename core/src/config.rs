//! Client configuration.
//!
//! The backend location is injected here rather than baked into the client,
//! so one process can talk to several backends (a live server, a mock on an
//! ephemeral port, a wiremock instance) side by side.

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_API_PATH: &str = "/api";

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme, host and port, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    /// Prefix under which every endpoint is mounted.
    pub api_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_path: DEFAULT_API_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_api_path(mut self, api_path: &str) -> Self {
        self.api_path = api_path.to_string();
        self
    }

    /// Read `HUB_BASE_URL` and `HUB_API_PATH`, keeping defaults for unset values.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("HUB_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(api_path) = std::env::var("HUB_API_PATH") {
            config.api_path = api_path;
        }
        config
    }

    /// Absolute URL for an endpoint path such as `/posts/3`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let api = self.api_path.trim_matches('/');
        if api.is_empty() {
            format!("{base}{path}")
        } else {
            format!("{base}/{api}{path}")
        }
    }
}
