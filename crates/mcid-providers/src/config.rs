//! Provider configuration structures.

use mcid_core::{McidError, McidResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Mojang API endpoints and transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MojangConfig {
    /// Session server base URL (profile-by-id lookups).
    pub session_base_url: String,
    /// Accounts API base URL (name lookups, bulk lookups, history).
    pub api_base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for MojangConfig {
    fn default() -> Self {
        Self {
            session_base_url: "https://sessionserver.mojang.com".to_string(),
            api_base_url: "https://api.mojang.com".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl MojangConfig {
    /// Request timeout as a duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Loads the configuration with `MCID_MOJANG_*` environment overrides.
    pub fn from_env() -> McidResult<Self> {
        load_with_prefix(&Self::default(), "MCID_MOJANG")
    }
}

/// Community UUID API endpoint and transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityConfig {
    /// Base URL of the service; the API version path is appended by the
    /// client.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            base_url: "https://uuid.turt2live.com".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CommunityConfig {
    /// Request timeout as a duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Loads the configuration with `MCID_COMMUNITY_*` environment
    /// overrides.
    pub fn from_env() -> McidResult<Self> {
        load_with_prefix(&Self::default(), "MCID_COMMUNITY")
    }
}

fn load_with_prefix<T>(defaults: &T, prefix: &str) -> McidResult<T>
where
    T: Serialize + serde::de::DeserializeOwned,
{
    let defaults = config::Config::try_from(defaults)
        .map_err(|e| McidError::configuration(e.to_string()))?;
    config::Config::builder()
        .add_source(defaults)
        .add_source(config::Environment::with_prefix(prefix))
        .build()
        .and_then(config::Config::try_deserialize)
        .map_err(|e| McidError::configuration(e.to_string()))
}
