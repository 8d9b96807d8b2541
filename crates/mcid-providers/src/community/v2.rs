//! Version 2 dialect of the community UUID API.

use crate::community::{join_keys, UNKNOWN};
use crate::config::CommunityConfig;
use crate::http::ApiClient;
use async_trait::async_trait;
use chrono::DateTime;
use mcid_core::{McidError, McidResult, PlayerId, PlayerProfile};
use mcid_service::LookupService;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const SERVICE_NAME: &str = "community v2";

/// Client for the `/api/v2` endpoints.
///
/// Single lookups additionally report an offline id, expiry metadata and
/// whether the service answered from its own cache. Bulk lookups return
/// v1-shaped minimal records.
pub struct ApiV2Service {
    http: ApiClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    uuid: String,
    name: String,
    #[serde(rename = "offline-uuid")]
    offline_uuid: Option<String>,
    #[serde(rename = "expires-in")]
    expires_in: Option<NumberOrString>,
    #[serde(rename = "expires-on")]
    expires_on: Option<NumberOrString>,
    source: Option<String>,
}

/// The service is inconsistent about numeric fields; both JSON numbers
/// and stringified numbers appear in the wild.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

impl NumberOrString {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(value) => value.parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawHistory {
    names: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawBulk {
    results: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawSample {
    results: Vec<RawRecord>,
}

impl ApiV2Service {
    /// Creates a client against the public service endpoint.
    pub fn new() -> McidResult<Self> {
        Self::with_config(CommunityConfig::default())
    }

    /// Creates a client with a custom base URL and timeout.
    pub fn with_config(config: CommunityConfig) -> McidResult<Self> {
        Ok(Self {
            http: ApiClient::new(SERVICE_NAME, config.timeout())?,
            base_url: format!("{}/api/v2", config.base_url.trim_end_matches('/')),
        })
    }

    fn parse_record(raw: RawRecord) -> Option<PlayerProfile> {
        if raw.uuid == UNKNOWN || raw.name == UNKNOWN {
            return None;
        }
        let id = PlayerId::parse(&raw.uuid).ok()?;
        let cached = raw
            .source
            .as_deref()
            .is_some_and(|source| source.eq_ignore_ascii_case("cache"));

        let mut profile = PlayerProfile::new(id, raw.name).from_provider_cache(cached);
        if let Some(offline) = raw
            .offline_uuid
            .as_deref()
            .and_then(|raw| PlayerId::parse(raw).ok())
        {
            profile = profile.with_offline_id(offline);
        }
        if let Some(expires_in) = raw
            .expires_in
            .and_then(|value| value.as_i64())
            .filter(|secs| *secs > 0)
        {
            profile = profile.with_expires_in(Duration::from_secs(expires_in as u64));
        }
        if let Some(expires_at) = raw
            .expires_on
            .and_then(|value| value.as_i64())
            .filter(|secs| *secs > 0)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
        {
            profile = profile.with_expires_at(expires_at);
        }
        Some(profile)
    }
}

#[async_trait]
impl LookupService for ApiV2Service {
    async fn lookup_by_id(&self, id: PlayerId) -> McidResult<Option<PlayerProfile>> {
        if id.is_nil() {
            return Err(McidError::invalid_argument("player id cannot be nil"));
        }
        let url = format!("{}/name/{}", self.base_url, id);
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

        let list = join_keys(ids.iter().map(PlayerId::to_string));
        let url = format!("{}/name/list/{}", self.base_url, list);
        let raw: Option<RawBulk> = self.http.get_json(&url).await?;

        let mut records = Vec::new();
        for (uuid, name) in raw.map(|raw| raw.results).unwrap_or_default() {
            if name == UNKNOWN {
                continue;
            }
            if let Ok(id) = PlayerId::parse(&uuid) {
                records.push(PlayerProfile::new(id, name));
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
        let raw: Option<RawBulk> = self.http.get_json(&url).await?;

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
        let raw: Option<RawSample> = self.http.get_json(&url).await?;
        Ok(raw
            .map(|raw| raw.results)
            .unwrap_or_default()
            .into_iter()
            .filter_map(Self::parse_record)
            .collect())
    }

    async fn name_history(&self, id: PlayerId) -> McidResult<Option<Vec<String>>> {
        if id.is_nil() {
            return Err(McidError::invalid_argument("player id cannot be nil"));
        }
        let url = format!("{}/history/{}", self.base_url, id);
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

    fn full_record() -> RawRecord {
        RawRecord {
            uuid: "c465b154-3c29-4dbf-a7e3-e0869504b8d8".to_string(),
            name: "turt2live".to_string(),
            offline_uuid: Some("d7e23401-9d3c-3dd9-9b51-c79c0b5c1d88".to_string()),
            expires_in: Some(NumberOrString::Number(3600)),
            expires_on: Some(NumberOrString::Text("1700000000".to_string())),
            source: Some("cache".to_string()),
        }
    }

    #[test]
    fn test_parse_full_record() {
        let profile = ApiV2Service::parse_record(full_record()).unwrap();
        assert_eq!(profile.name, "turt2live");
        assert!(profile.cached);
        assert!(profile.offline_id.is_some());
        assert_eq!(profile.expires_in, Some(Duration::from_secs(3600)));
        assert_eq!(
            profile.expires_at,
            DateTime::from_timestamp(1_700_000_000, 0)
        );
    }

    #[test]
    fn test_parse_record_without_expiry_metadata() {
        let raw = RawRecord {
            uuid: "c465b154-3c29-4dbf-a7e3-e0869504b8d8".to_string(),
            name: "turt2live".to_string(),
            offline_uuid: None,
            expires_in: None,
            expires_on: None,
            source: None,
        };
        let profile = ApiV2Service::parse_record(raw).unwrap();
        assert!(!profile.cached);
        assert_eq!(profile.expires_in, None);
        assert_eq!(profile.expires_at, None);
    }

    #[test]
    fn test_parse_record_ignores_non_positive_expiry() {
        let mut raw = full_record();
        raw.expires_in = Some(NumberOrString::Number(0));
        raw.expires_on = Some(NumberOrString::Number(-1));
        let profile = ApiV2Service::parse_record(raw).unwrap();
        assert_eq!(profile.expires_in, None);
        assert_eq!(profile.expires_at, None);
    }

    #[test]
    fn test_parse_record_rejects_unknown() {
        let mut raw = full_record();
        raw.name = UNKNOWN.to_string();
        assert!(ApiV2Service::parse_record(raw).is_none());
    }

    #[test]
    fn test_number_or_string_coercion() {
        assert_eq!(NumberOrString::Number(42).as_i64(), Some(42));
        assert_eq!(NumberOrString::Text("42".to_string()).as_i64(), Some(42));
        assert_eq!(NumberOrString::Text("garbage".to_string()).as_i64(), None);
    }
}
