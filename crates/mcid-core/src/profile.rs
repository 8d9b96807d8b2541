//! Player profile record and offline-id derivation.

use crate::PlayerId;
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Builder;

/// An immutable record describing one resolved player.
///
/// Providers differ in how much they report: a session lookup carries an
/// offline id and expiry metadata, a bulk lookup only id and name. Absent
/// metadata is typed as `None`, never sentinel-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    /// Canonical player identifier.
    pub id: PlayerId,
    /// Player name, original casing preserved.
    pub name: String,
    /// Deterministic offline identifier, when the source defines one.
    pub offline_id: Option<PlayerId>,
    /// True when the provider reported this value from its own cache.
    pub cached: bool,
    /// Provider-reported remaining lifetime.
    pub expires_in: Option<Duration>,
    /// Provider-reported absolute expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

impl PlayerProfile {
    /// Creates a minimal profile with no provenance or expiry metadata.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            offline_id: None,
            cached: false,
            expires_in: None,
            expires_at: None,
        }
    }

    /// Sets the offline identifier.
    #[must_use]
    pub fn with_offline_id(mut self, offline_id: PlayerId) -> Self {
        self.offline_id = Some(offline_id);
        self
    }

    /// Sets the provider-reported remaining lifetime.
    #[must_use]
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = Some(expires_in);
        self
    }

    /// Sets the provider-reported absolute expiry.
    #[must_use]
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Marks whether the provider served this value from its own cache.
    #[must_use]
    pub fn from_provider_cache(mut self, cached: bool) -> Self {
        self.cached = cached;
        self
    }

    /// Derives the deterministic offline identifier for a name.
    ///
    /// A version 3 (MD5) UUID over the bytes of `"OfflinePlayer:" + name`,
    /// matching what game servers compute for offline-mode players.
    #[must_use]
    pub fn derive_offline_id(name: &str) -> PlayerId {
        let digest = Md5::digest(format!("OfflinePlayer:{name}").as_bytes());
        PlayerId::from_uuid(Builder::from_md5_bytes(digest.into()).into_uuid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::{Uuid, Variant, Version};

    fn player_id() -> PlayerId {
        PlayerId::parse("069a79f4-44e9-4726-a5be-fca90e38aaf5").unwrap()
    }

    #[test]
    fn test_minimal_profile() {
        let profile = PlayerProfile::new(player_id(), "Notch");
        assert_eq!(profile.name, "Notch");
        assert_eq!(profile.offline_id, None);
        assert!(!profile.cached);
        assert_eq!(profile.expires_in, None);
        assert_eq!(profile.expires_at, None);
    }

    #[test]
    fn test_builder_methods() {
        let expires_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let profile = PlayerProfile::new(player_id(), "Notch")
            .with_offline_id(PlayerProfile::derive_offline_id("Notch"))
            .with_expires_in(Duration::from_secs(120))
            .with_expires_at(expires_at)
            .from_provider_cache(true);

        assert!(profile.offline_id.is_some());
        assert!(profile.cached);
        assert_eq!(profile.expires_in, Some(Duration::from_secs(120)));
        assert_eq!(profile.expires_at, Some(expires_at));
    }

    #[test]
    fn test_offline_id_is_deterministic() {
        let first = PlayerProfile::derive_offline_id("Notch");
        let second = PlayerProfile::derive_offline_id("Notch");
        assert_eq!(first, second);
    }

    #[test]
    fn test_offline_id_is_name_sensitive() {
        assert_ne!(
            PlayerProfile::derive_offline_id("Notch"),
            PlayerProfile::derive_offline_id("notch")
        );
    }

    #[test]
    fn test_offline_id_is_version_3() {
        let id: Uuid = PlayerProfile::derive_offline_id("Notch").into_inner();
        assert_eq!(id.get_version(), Some(Version::Md5));
        assert_eq!(id.get_variant(), Variant::RFC4122);
    }

    #[test]
    fn test_profile_serde_round_trip() {
        let profile = PlayerProfile::new(player_id(), "Notch")
            .with_expires_in(Duration::from_secs(60));
        let json = serde_json::to_string(&profile).unwrap();
        let back: PlayerProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
