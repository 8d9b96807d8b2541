//! Mojang public API client.

use crate::config::MojangConfig;
use crate::http::ApiClient;
use async_trait::async_trait;
use mcid_core::{McidError, McidResult, PlayerId, PlayerProfile};
use mcid_service::LookupService;
use serde::Deserialize;
use tracing::warn;

/// Hard limit the bulk name endpoint enforces per request.
pub const MAX_BULK_NAMES: usize = 100;

const SERVICE_NAME: &str = "Mojang Public API";

/// Client for the Mojang account and session APIs.
///
/// The API has no batch lookup by id and no sampling endpoint: bulk id
/// lookups degrade to per-id requests and `random_sample` always returns
/// an empty list. Offline identifiers are derived locally since Mojang
/// does not report them.
pub struct MojangService {
    http: ApiClient,
    session_base_url: String,
    api_base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawProfile {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawHistoryEntry {
    name: String,
}

impl MojangService {
    /// Creates a client against the public Mojang endpoints.
    pub fn new() -> McidResult<Self> {
        Self::with_config(MojangConfig::default())
    }

    /// Creates a client with custom endpoints and timeout.
    pub fn with_config(config: MojangConfig) -> McidResult<Self> {
        Ok(Self {
            http: ApiClient::new(SERVICE_NAME, config.timeout())?,
            session_base_url: config.session_base_url.trim_end_matches('/').to_string(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn profile_from_raw(raw: RawProfile, fallback_id: Option<PlayerId>) -> Option<PlayerProfile> {
        let id = match raw.id.as_deref().map(PlayerId::parse) {
            Some(Ok(id)) => id,
            Some(Err(_)) => {
                warn!("Discarding Mojang record with malformed id");
                return None;
            }
            None => fallback_id?,
        };
        let name = raw.name?;
        let offline_id = PlayerProfile::derive_offline_id(&name);
        Some(PlayerProfile::new(id, name).with_offline_id(offline_id))
    }
}

#[async_trait]
impl LookupService for MojangService {
    async fn lookup_by_id(&self, id: PlayerId) -> McidResult<Option<PlayerProfile>> {
        if id.is_nil() {
            return Err(McidError::invalid_argument("player id cannot be nil"));
        }
        let url = format!(
            "{}/session/minecraft/profile/{}",
            self.session_base_url,
            id.simple()
        );
        let raw: Option<RawProfile> = self.http.get_json(&url).await?;
        Ok(raw.and_then(|raw| Self::profile_from_raw(raw, Some(id))))
    }

    async fn lookup_by_name(&self, name: &str) -> McidResult<Option<PlayerProfile>> {
        if name.is_empty() {
            return Err(McidError::invalid_argument("player name cannot be empty"));
        }
        let url = format!("{}/users/profiles/minecraft/{}", self.api_base_url, name);
        let raw: Option<RawProfile> = self.http.get_json(&url).await?;
        Ok(raw.and_then(|mut raw| {
            // The name endpoint may omit the canonical name; fall back to
            // the requested one.
            if raw.name.is_none() {
                raw.name = Some(name.to_string());
            }
            Self::profile_from_raw(raw, None)
        }))
    }

    async fn bulk_lookup_by_ids(&self, ids: &[PlayerId]) -> McidResult<Vec<PlayerProfile>> {
        if ids.iter().any(PlayerId::is_nil) {
            return Err(McidError::invalid_argument("player id cannot be nil"));
        }

        // No batch endpoint for ids; resolve one at a time.
        let mut records = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(profile) = self.lookup_by_id(id).await? {
                records.push(profile);
            }
        }
        Ok(records)
    }

    async fn bulk_lookup_by_names(&self, names: &[String]) -> McidResult<Vec<PlayerProfile>> {
        if names.iter().any(|name| name.is_empty()) {
            return Err(McidError::invalid_argument("player name cannot be empty"));
        }
        if names.len() > MAX_BULK_NAMES {
            return Err(McidError::invalid_argument(format!(
                "at most {} names per bulk request",
                MAX_BULK_NAMES
            )));
        }
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/profiles/minecraft", self.api_base_url);
        let raw: Option<Vec<RawProfile>> = self.http.post_json(&url, names).await?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| Self::profile_from_raw(raw, None))
            .collect())
    }

    async fn random_sample(&self, amount: usize) -> McidResult<Vec<PlayerProfile>> {
        if amount == 0 {
            return Err(McidError::invalid_argument("sample amount must be positive"));
        }
        // The API offers no sampling endpoint.
        Ok(Vec::new())
    }

    async fn name_history(&self, id: PlayerId) -> McidResult<Option<Vec<String>>> {
        if id.is_nil() {
            return Err(McidError::invalid_argument("player id cannot be nil"));
        }
        let url = format!("{}/users/profiles/{}/names", self.api_base_url, id.simple());
        let raw: Option<Vec<RawHistoryEntry>> = self.http.get_json(&url).await?;
        Ok(raw.map(|entries| entries.into_iter().map(|entry| entry.name).collect()))
    }

    fn service_name(&self) -> &str {
        SERVICE_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_raw_requires_name() {
        let raw = RawProfile {
            id: Some("069a79f444e94726a5befca90e38aaf5".to_string()),
            name: None,
        };
        assert!(MojangService::profile_from_raw(raw, None).is_none());
    }

    #[test]
    fn test_profile_from_raw_derives_offline_id() {
        let raw = RawProfile {
            id: Some("069a79f444e94726a5befca90e38aaf5".to_string()),
            name: Some("Notch".to_string()),
        };
        let profile = MojangService::profile_from_raw(raw, None).unwrap();
        assert_eq!(
            profile.offline_id,
            Some(PlayerProfile::derive_offline_id("Notch"))
        );
        assert!(!profile.cached);
    }

    #[test]
    fn test_profile_from_raw_uses_fallback_id() {
        let fallback = PlayerId::parse("069a79f4-44e9-4726-a5be-fca90e38aaf5").unwrap();
        let raw = RawProfile {
            id: None,
            name: Some("Notch".to_string()),
        };
        let profile = MojangService::profile_from_raw(raw, Some(fallback)).unwrap();
        assert_eq!(profile.id, fallback);
    }
}
