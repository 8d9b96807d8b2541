//! In-memory caching for the lookup surface.
//!
//! The store is reachable by two independent keys (player id and
//! lowercased name) that are kept mutually consistent, with lazy
//! time-based expiration evaluated at access time.

mod caching_service;
mod store;

pub use caching_service::{CachingLookupService, DEFAULT_CACHE_DURATION};
