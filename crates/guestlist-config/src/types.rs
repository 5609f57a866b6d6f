//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [server]
//! url = "https://rsvp.example.com"
//!
//! [client]
//! timeout_secs = 30
//! refresh_timeout_secs = 10
//! user_agent = "guestlist/0.1"
//!
//! [drafts]
//! path = "/home/me/.config/guestlist/form-drafts.json"
//! ```
//!
//! Every field is optional so partial files (project-local overrides) merge
//! cleanly; accessors apply defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Server URL used when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Environment variable overriding the configured server URL.
pub const SERVER_URL_ENV: &str = "GUESTLIST_SERVER_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 10;
const DRAFTS_FILE: &str = "form-drafts.json";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub server: ServerSection,
    pub client: ClientSection,
    pub drafts: DraftsSection,
}

/// `[server]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Base URL of the admin API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// `[client]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    /// Per-request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Bound on a single session refresh call, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// `[drafts]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftsSection {
    /// Where unsent form values are kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl ConsoleConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: ConsoleConfig) {
        if other.server.url.is_some() {
            self.server.url = other.server.url;
        }
        if other.client.timeout_secs.is_some() {
            self.client.timeout_secs = other.client.timeout_secs;
        }
        if other.client.refresh_timeout_secs.is_some() {
            self.client.refresh_timeout_secs = other.client.refresh_timeout_secs;
        }
        if other.client.user_agent.is_some() {
            self.client.user_agent = other.client.user_agent;
        }
        if other.drafts.path.is_some() {
            self.drafts.path = other.drafts.path;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.client.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid {
                field: "client.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.client.refresh_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid {
                field: "client.refresh_timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Effective server URL.
    ///
    /// Resolution order:
    /// 1. `flag` (the `--server` CLI argument)
    /// 2. `GUESTLIST_SERVER_URL` environment variable
    /// 3. `[server] url`
    /// 4. [`DEFAULT_SERVER_URL`]
    pub fn server_url(&self, flag: Option<&str>) -> String {
        let env = std::env::var(SERVER_URL_ENV).ok();
        self.pick_server_url(flag, env.as_deref())
    }

    fn pick_server_url(&self, flag: Option<&str>, env: Option<&str>) -> String {
        flag.filter(|s| !s.is_empty())
            .or(env.filter(|s| !s.is_empty()))
            .or(self.server.url.as_deref())
            .unwrap_or(DEFAULT_SERVER_URL)
            .to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.client.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(
            self.client
                .refresh_timeout_secs
                .unwrap_or(DEFAULT_REFRESH_TIMEOUT_SECS),
        )
    }

    /// Draft file location; defaults to `form-drafts.json` in `config_dir`.
    pub fn drafts_path(&self, config_dir: &std::path::Path) -> PathBuf {
        self.drafts
            .path
            .clone()
            .unwrap_or_else(|| config_dir.join(DRAFTS_FILE))
    }
}
