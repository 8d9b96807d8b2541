//! Dual-indexed, time-expiring profile store.

use mcid_core::{PlayerId, PlayerProfile};
use rand::Rng;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// One cached profile plus the absolute instant it expires.
#[derive(Debug, Clone)]
struct CacheEntry {
    profile: PlayerProfile,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(profile: PlayerProfile, ttl: Duration) -> Self {
        Self {
            profile,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Store reachable by player id and by lowercased name.
///
/// Invariant: every entry present in one index is present in the other
/// under the same profile. Insertions displace any previous entry for
/// either key, and expired entries are purged from both indices the
/// moment an access observes them.
#[derive(Debug, Default)]
pub(crate) struct ProfileStore {
    by_id: HashMap<PlayerId, CacheEntry>,
    by_name: HashMap<String, CacheEntry>,
}

impl ProfileStore {
    /// Inserts a profile under both keys with the given time to live.
    pub fn insert(&mut self, profile: PlayerProfile, ttl: Duration) {
        // Displace stale entries for both prospective keys first, so the
        // indices never disagree after a rename or id reuse.
        self.purge_by_id(profile.id);
        self.purge_by_name(&profile.name.to_lowercase());

        let entry = CacheEntry::new(profile, ttl);
        self.by_name
            .insert(entry.profile.name.to_lowercase(), entry.clone());
        self.by_id.insert(entry.profile.id, entry);
    }

    /// Returns a live profile by id, purging it from both indices if it
    /// has expired.
    pub fn get_live_by_id(&mut self, id: PlayerId) -> Option<PlayerProfile> {
        match self.by_id.get(&id) {
            Some(entry) if !entry.is_expired() => Some(entry.profile.clone()),
            Some(_) => {
                self.purge_by_id(id);
                None
            }
            None => None,
        }
    }

    /// Returns a live profile by name (case-insensitive), purging it from
    /// both indices if it has expired.
    pub fn get_live_by_name(&mut self, name: &str) -> Option<PlayerProfile> {
        let key = name.to_lowercase();
        match self.by_name.get(&key) {
            Some(entry) if !entry.is_expired() => Some(entry.profile.clone()),
            Some(_) => {
                self.purge_by_name(&key);
                None
            }
            None => None,
        }
    }

    /// Picks a uniformly random id from the id index.
    pub fn random_id<R: Rng>(&self, rng: &mut R) -> Option<PlayerId> {
        if self.by_id.is_empty() {
            return None;
        }
        let nth = rng.gen_range(0..self.by_id.len());
        self.by_id.keys().nth(nth).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    fn purge_by_id(&mut self, id: PlayerId) {
        if let Some(entry) = self.by_id.remove(&id) {
            self.by_name.remove(&entry.profile.name.to_lowercase());
        }
    }

    fn purge_by_name(&mut self, key: &str) {
        if let Some(entry) = self.by_name.remove(key) {
            self.by_id.remove(&entry.profile.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    fn profile(id: &str, name: &str) -> PlayerProfile {
        PlayerProfile::new(PlayerId::parse(id).unwrap(), name)
    }

    #[test]
    fn test_insert_reachable_by_both_keys() {
        let mut store = ProfileStore::default();
        store.insert(profile("069a79f4-44e9-4726-a5be-fca90e38aaf5", "Notch"), TTL);

        let by_id = store
            .get_live_by_id(PlayerId::parse("069a79f4-44e9-4726-a5be-fca90e38aaf5").unwrap())
            .unwrap();
        let by_name = store.get_live_by_name("notch").unwrap();
        assert_eq!(by_id, by_name);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_name_lookup_is_case_insensitive() {
        let mut store = ProfileStore::default();
        store.insert(profile("069a79f4-44e9-4726-a5be-fca90e38aaf5", "Notch"), TTL);

        assert!(store.get_live_by_name("NOTCH").is_some());
        assert!(store.get_live_by_name("Notch").is_some());
    }

    #[test]
    fn test_expired_entry_purged_from_both_indices() {
        let mut store = ProfileStore::default();
        store.insert(
            profile("069a79f4-44e9-4726-a5be-fca90e38aaf5", "Notch"),
            Duration::from_millis(5),
        );
        std::thread::sleep(Duration::from_millis(20));

        assert!(store
            .get_live_by_id(PlayerId::parse("069a79f4-44e9-4726-a5be-fca90e38aaf5").unwrap())
            .is_none());
        assert!(store.get_live_by_name("notch").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_reinsert_under_new_name_drops_old_name_key() {
        let mut store = ProfileStore::default();
        store.insert(profile("069a79f4-44e9-4726-a5be-fca90e38aaf5", "Notch"), TTL);
        store.insert(profile("069a79f4-44e9-4726-a5be-fca90e38aaf5", "Renamed"), TTL);

        assert!(store.get_live_by_name("notch").is_none());
        assert_eq!(store.get_live_by_name("renamed").unwrap().name, "Renamed");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_random_id_on_empty_store() {
        let store = ProfileStore::default();
        assert!(store.random_id(&mut rand::thread_rng()).is_none());
    }

    #[test]
    fn test_random_id_returns_stored_key() {
        let mut store = ProfileStore::default();
        store.insert(profile("069a79f4-44e9-4726-a5be-fca90e38aaf5", "Notch"), TTL);

        let id = store.random_id(&mut rand::thread_rng()).unwrap();
        assert_eq!(id, PlayerId::parse("069a79f4-44e9-4726-a5be-fca90e38aaf5").unwrap());
    }
}
