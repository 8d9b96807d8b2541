//! Caching decorator over a wrapped lookup service.

use crate::cache::store::ProfileStore;
use crate::LookupService;
use async_trait::async_trait;
use mcid_core::{McidError, McidResult, PlayerId, PlayerProfile};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default maximum cache duration (1 hour).
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(60 * 60);

/// A lookup service that caches results in memory.
///
/// Wraps another [`LookupService`] and serves repeat lookups from a
/// dual-indexed store (by id and by lowercased name). Entries live for the
/// provider's own expiration hint when it reports one, else for the
/// configured maximum cache duration. Expiration is evaluated lazily at
/// access time; no background task sweeps the store.
///
/// The store lock is never held across a call to the wrapped service, so
/// cache hits are never serialized behind a slow remote round-trip. Two
/// tasks missing the same key concurrently may both reach the wrapped
/// service; the second write is an idempotent overwrite.
pub struct CachingLookupService<S> {
    inner: Arc<S>,
    store: Mutex<ProfileStore>,
    max_cache_duration: Duration,
}

impl<S: LookupService> CachingLookupService<S> {
    /// Creates a caching service with the default one-hour cache duration.
    #[must_use]
    pub fn new(inner: Arc<S>) -> Self {
        Self {
            inner,
            store: Mutex::new(ProfileStore::default()),
            max_cache_duration: DEFAULT_CACHE_DURATION,
        }
    }

    /// Creates a caching service with a custom maximum cache duration.
    ///
    /// Fails with `InvalidArgument` for a zero duration.
    pub fn with_max_cache_duration(inner: Arc<S>, max_cache_duration: Duration) -> McidResult<Self> {
        if max_cache_duration.is_zero() {
            return Err(McidError::invalid_argument(
                "maximum cache duration must be positive",
            ));
        }
        Ok(Self {
            inner,
            store: Mutex::new(ProfileStore::default()),
            max_cache_duration,
        })
    }

    /// Pre-sets the cache from id-to-name pairs, using the configured
    /// maximum cache duration.
    ///
    /// Pairs with a nil id or an empty name are skipped. The synthetic
    /// profiles carry no provenance, offline id, or expiry metadata.
    pub fn seed(&self, entries: &HashMap<PlayerId, String>) {
        self.seed_entries(entries, self.max_cache_duration);
    }

    /// Pre-sets the cache from id-to-name pairs with an explicit time to
    /// live.
    ///
    /// Fails with `InvalidArgument` for a zero duration; pairs with a nil
    /// id or an empty name are skipped rather than failing the call.
    pub fn seed_with_ttl(
        &self,
        entries: &HashMap<PlayerId, String>,
        ttl: Duration,
    ) -> McidResult<()> {
        if ttl.is_zero() {
            return Err(McidError::invalid_argument("seed ttl must be positive"));
        }
        self.seed_entries(entries, ttl);
        Ok(())
    }

    fn seed_entries(&self, entries: &HashMap<PlayerId, String>, ttl: Duration) {
        let mut store = self.store.lock();
        let mut seeded = 0usize;
        for (id, name) in entries {
            if id.is_nil() || name.is_empty() {
                continue;
            }
            store.insert(PlayerProfile::new(*id, name.clone()), ttl);
            seeded += 1;
        }
        debug!("Seeded {} of {} entries", seeded, entries.len());
    }

    /// TTL for a freshly obtained profile: the provider's positive
    /// expiration hint, else the configured maximum.
    fn effective_ttl(&self, profile: &PlayerProfile) -> Duration {
        profile
            .expires_in
            .filter(|hint| !hint.is_zero())
            .unwrap_or(self.max_cache_duration)
    }

    fn store_profile(&self, profile: &PlayerProfile) {
        let ttl = self.effective_ttl(profile);
        self.store.lock().insert(profile.clone(), ttl);
    }

    /// Resolves one id: store first, wrapped service on miss.
    ///
    /// `Unavailable` from the wrapped service degrades to "no result";
    /// every other error propagates.
    async fn resolve_by_id(&self, id: PlayerId) -> McidResult<Option<PlayerProfile>> {
        if let Some(hit) = self.store.lock().get_live_by_id(id) {
            debug!("Cache hit for id '{}'", id);
            return Ok(Some(hit));
        }
        debug!("Cache miss for id '{}'", id);

        match self.inner.lookup_by_id(id).await {
            Ok(Some(profile)) => {
                self.store_profile(&profile);
                Ok(Some(profile))
            }
            Ok(None) => Ok(None),
            Err(err) if err.is_unavailable() => {
                warn!("Lookup for id '{}' unavailable: {}", id, err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Resolves one name: store first, wrapped service on miss.
    async fn resolve_by_name(&self, name: &str) -> McidResult<Option<PlayerProfile>> {
        if let Some(hit) = self.store.lock().get_live_by_name(name) {
            debug!("Cache hit for name '{}'", name);
            return Ok(Some(hit));
        }
        debug!("Cache miss for name '{}'", name);

        match self.inner.lookup_by_name(name).await {
            Ok(Some(profile)) => {
                self.store_profile(&profile);
                Ok(Some(profile))
            }
            Ok(None) => Ok(None),
            Err(err) if err.is_unavailable() => {
                warn!("Lookup for name '{}' unavailable: {}", name, err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl<S: LookupService + 'static> LookupService for CachingLookupService<S> {
    async fn lookup_by_id(&self, id: PlayerId) -> McidResult<Option<PlayerProfile>> {
        Ok(self.bulk_lookup_by_ids(&[id]).await?.into_iter().next())
    }

    async fn lookup_by_name(&self, name: &str) -> McidResult<Option<PlayerProfile>> {
        Ok(self
            .bulk_lookup_by_names(&[name.to_string()])
            .await?
            .into_iter()
            .next())
    }

    async fn bulk_lookup_by_ids(&self, ids: &[PlayerId]) -> McidResult<Vec<PlayerProfile>> {
        if ids.iter().any(PlayerId::is_nil) {
            return Err(McidError::invalid_argument("player id cannot be nil"));
        }

        let mut records = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(profile) = self.resolve_by_id(id).await? {
                records.push(profile);
            }
        }
        Ok(records)
    }

    async fn bulk_lookup_by_names(&self, names: &[String]) -> McidResult<Vec<PlayerProfile>> {
        if names.iter().any(|name| name.is_empty()) {
            return Err(McidError::invalid_argument("player name cannot be empty"));
        }

        let mut records = Vec::with_capacity(names.len());
        for name in names {
            if let Some(profile) = self.resolve_by_name(name).await? {
                records.push(profile);
            }
        }
        Ok(records)
    }

    async fn random_sample(&self, amount: usize) -> McidResult<Vec<PlayerProfile>> {
        if amount == 0 {
            return Err(McidError::invalid_argument("sample amount must be positive"));
        }

        let mut records: Vec<PlayerProfile> = Vec::new();
        {
            let mut store = self.store.lock();
            // Attempts are bounded by the index size so a store smaller
            // than the requested amount cannot loop forever.
            let mut attempts = store.len();
            let mut rng = rand::thread_rng();
            while records.len() < amount && attempts > 0 && !store.is_empty() {
                attempts -= 1;
                let Some(id) = store.random_id(&mut rng) else {
                    break;
                };
                if let Some(profile) = store.get_live_by_id(id) {
                    if !records.iter().any(|known| known.id == profile.id) {
                        records.push(profile);
                    }
                }
            }
        }

        if records.len() < amount {
            let shortfall = amount - records.len();
            debug!("Requesting {} sampled profiles from wrapped service", shortfall);
            let pulled = match self.inner.random_sample(shortfall).await {
                Ok(pulled) => pulled,
                Err(err) if err.is_unavailable() => {
                    warn!("Random sample unavailable: {}", err);
                    Vec::new()
                }
                Err(err) => return Err(err),
            };
            for profile in pulled {
                self.store_profile(&profile);
                if !records.iter().any(|known| known.id == profile.id) {
                    records.push(profile);
                }
            }
        }

        Ok(records)
    }

    async fn name_history(&self, id: PlayerId) -> McidResult<Option<Vec<String>>> {
        self.inner.name_history(id).await
    }

    fn service_name(&self) -> &str {
        self.inner.service_name()
    }
}
