//! Version 1 dialect of the community UUID API.

use crate::community::{join_keys, UNKNOWN};
use crate::config::CommunityConfig;
use crate::http::ApiClient;
use async_trait::async_trait;
use mcid_core::{McidError, McidResult, PlayerId, PlayerProfile};
use mcid_service::LookupService;
use serde::Deserialize;
use std::collections::HashMap;

const SERVICE_NAME: &str = "community v1";

/// Client for the `/api/v1` endpoints.
///
/// The v1 dialect carries ids undashed on the wire and reports no expiry
/// or provenance metadata.
pub struct ApiV1Service {
    http: ApiClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    uuid: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawHistory {
    names: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawNameEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawBulkByIds {
    results: HashMap<String, RawNameEntry>,
}

#[derive(Debug, Deserialize)]
struct RawBulkByNames {
    results: HashMap<String, String>,
}

impl ApiV1Service {
    /// Creates a client against the public service endpoint.
    pub fn new() -> McidResult<Self> {
        Self::with_config(CommunityConfig::default())
    }

    /// Creates a client with a custom base URL and timeout.
    pub fn with_config(config: CommunityConfig) -> McidResult<Self> {
        Ok(Self {
            http: ApiClient::new(SERVICE_NAME, config.timeout())?,
            base_url: format!("{}/api/v1", config.base_url.trim_end_matches('/')),
        })
    }

    fn parse_record(raw: RawRecord) -> Option<PlayerProfile> {
        if raw.uuid == UNKNOWN || raw.name == UNKNOWN {
            return None;
        }
        let id = PlayerId::parse(&raw.uuid).ok()?;
        Some(PlayerProfile::new(id, raw.name))
    }
}

#[async_trait]
impl LookupService for ApiV1Service {
    async fn lookup_by_id(&self, id: PlayerId) -> McidResult<Option<PlayerProfile>> {
        if id.is_nil() {
            return Err(McidError::invalid_argument("player id cannot be nil"));
        }
        let url = format!("{}/name/{}", self.base_url, id.simple());
        let raw: Option<RawRecord> = self.http.get_json(&url).await?;
        Ok(raw.and_then(Self::parse_record))
    }

    async fn lookup_by_name(&self, name: &str) -> McidResult<Option<PlayerProfile>> {
        if name.is_empty() {
            return Err(McidError::invalid_argument("player name cannot be empty"));
        }
        let url = format!("{}/uuid/{}", self.base_url, name);
        let raw: Option<RawRecord> = self.http.get_json(&url).await?;
        Ok(raw.and_then(Self::parse_record))
    }

    async fn bulk_lookup_by_ids(&self, ids: &[PlayerId]) -> McidResult<Vec<PlayerProfile>> {
        if ids.is_empty() {
            return Err(McidError::invalid_argument("at least one id is required"));
        }
        if ids.iter().any(PlayerId::is_nil) {
            return Err(McidError::invalid_argument("player id cannot be nil"));
        }

        let list = join_keys(ids.iter().map(PlayerId::simple));
        let url = format!("{}/name/list/{}", self.base_url, list);
        let raw: Option<RawBulkByIds> = self.http.get_json(&url).await?;

        let mut records = Vec::new();
        for (uuid, entry) in raw.map(|raw| raw.results).unwrap_or_default() {
            if entry.name == UNKNOWN {
                continue;
            }
            if let Ok(id) = PlayerId::parse(&uuid) {
                records.push(PlayerProfile::new(id, entry.name));
            }
        }
        Ok(records)
    }

    async fn bulk_lookup_by_names(&self, names: &[String]) -> McidResult<Vec<PlayerProfile>> {
        if names.is_empty() {
            return Err(McidError::invalid_argument("at least one name is required"));
        }
        if names.iter().any(|name| name.is_empty()) {
            return Err(McidError::invalid_argument("player name cannot be empty"));
        }

        let list = join_keys(names.iter().cloned());
        let url = format!("{}/uuid/list/{}", self.base_url, list);
        let raw: Option<RawBulkByNames> = self.http.get_json(&url).await?;

        let mut records = Vec::new();
        for (name, uuid) in raw.map(|raw| raw.results).unwrap_or_default() {
            if uuid == UNKNOWN || name == UNKNOWN {
                continue;
            }
            if let Ok(id) = PlayerId::parse(&uuid) {
                records.push(PlayerProfile::new(id, name));
            }
        }
        Ok(records)
    }

    async fn random_sample(&self, amount: usize) -> McidResult<Vec<PlayerProfile>> {
        if amount == 0 {
            return Err(McidError::invalid_argument("sample amount must be positive"));
        }
        let url = format!("{}/random/{}", self.base_url, amount);
        let raw: Option<Vec<RawRecord>> = self.http.get_json(&url).await?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(Self::parse_record)
            .collect())
    }

    async fn name_history(&self, id: PlayerId) -> McidResult<Option<Vec<String>>> {
        if id.is_nil() {
            return Err(McidError::invalid_argument("player id cannot be nil"));
        }
        let url = format!("{}/history/{}", self.base_url, id.simple());
        let raw: Option<RawHistory> = self.http.get_json(&url).await?;
        Ok(raw.map(|raw| raw.names))
    }

    fn service_name(&self) -> &str {
        SERVICE_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_accepts_undashed_uuid() {
        let raw = RawRecord {
            uuid: "069a79f444e94726a5befca90e38aaf5".to_string(),
            name: "Notch".to_string(),
        };
        let profile = ApiV1Service::parse_record(raw).unwrap();
        assert_eq!(profile.id.simple(), "069a79f444e94726a5befca90e38aaf5");
        assert_eq!(profile.name, "Notch");
        assert_eq!(profile.offline_id, None);
    }

    #[test]
    fn test_parse_record_rejects_unknown() {
        let raw = RawRecord {
            uuid: UNKNOWN.to_string(),
            name: "Notch".to_string(),
        };
        assert!(ApiV1Service::parse_record(raw).is_none());

        let raw = RawRecord {
            uuid: "069a79f444e94726a5befca90e38aaf5".to_string(),
            name: UNKNOWN.to_string(),
        };
        assert!(ApiV1Service::parse_record(raw).is_none());
    }
}
