//! Community UUID API clients.
//!
//! Two wire dialects of the same service, one client per version, both
//! implementing [`mcid_service::LookupService`]. The version is chosen at
//! construction time.

mod v1;
mod v2;

pub use v1::ApiV1Service;
pub use v2::ApiV2Service;

/// Sentinel the service uses for records it could not resolve.
pub(crate) const UNKNOWN: &str = "unknown";

/// Joins bulk keys into the `a;b;c` path segment both dialects expect.
pub(crate) fn join_keys<I>(values: I) -> String
where
    I: IntoIterator<Item = String>,
{
    values.into_iter().collect::<Vec<_>>().join(";")
}
