//! # Mcid Providers
//!
//! HTTP implementations of the [`mcid_service::LookupService`] trait:
//! the Mojang public API and the community UUID API in its v1 and v2 wire
//! dialects. All providers map HTTP 429 to `RateLimited` and
//! connectivity or payload failures to `Unavailable`.

pub mod community;
pub mod config;
mod http;
pub mod mojang;

pub use community::{ApiV1Service, ApiV2Service};
pub use config::{CommunityConfig, MojangConfig};
pub use mojang::MojangService;
