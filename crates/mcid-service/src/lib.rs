//! # Mcid Service
//!
//! Lookup service surface for the mcid library: the [`LookupService`]
//! trait implemented by every backend, and [`CachingLookupService`], the
//! dual-indexed, time-expiring decorator that shields rate-limited remote
//! APIs from repeat lookups.

pub mod cache;
pub mod lookup_service;

pub use cache::*;
pub use lookup_service::*;
