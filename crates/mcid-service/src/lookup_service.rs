//! Lookup service trait definition.

use async_trait::async_trait;
use mcid_core::{McidResult, PlayerId, PlayerProfile};

/// Capability set shared by every profile lookup backend.
///
/// Provider variants (API versions, the caching decorator) all implement
/// this one trait and are selected at construction time. Every method may
/// fail with `RateLimited` when the backing service throttles, or with
/// `Unavailable` when it cannot be reached or answers garbage.
#[async_trait]
pub trait LookupService: Send + Sync {
    /// Looks up a single profile by player id.
    ///
    /// Returns `None` when the service has no record for the id.
    async fn lookup_by_id(&self, id: PlayerId) -> McidResult<Option<PlayerProfile>>;

    /// Looks up a single profile by player name.
    ///
    /// Returns `None` when the service has no record for the name.
    async fn lookup_by_name(&self, name: &str) -> McidResult<Option<PlayerProfile>>;

    /// Resolves each id independently, preserving input order.
    ///
    /// Unresolved ids are omitted, so the result may be shorter than the
    /// input.
    async fn bulk_lookup_by_ids(&self, ids: &[PlayerId]) -> McidResult<Vec<PlayerProfile>>;

    /// Resolves each name independently, preserving input order.
    ///
    /// Unresolved names are omitted, so the result may be shorter than the
    /// input.
    async fn bulk_lookup_by_names(&self, names: &[String]) -> McidResult<Vec<PlayerProfile>>;

    /// Returns up to `amount` profiles sampled by the service.
    ///
    /// May return fewer than requested; that is not an error.
    async fn random_sample(&self, amount: usize) -> McidResult<Vec<PlayerProfile>>;

    /// Returns the past names of a player, or `None` for an unknown id.
    async fn name_history(&self, id: PlayerId) -> McidResult<Option<Vec<String>>>;

    /// Human-readable name of the backing service.
    fn service_name(&self) -> &str;
}
