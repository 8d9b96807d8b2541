//! # Mcid Core
//!
//! Core types and error definitions for the mcid lookup library.
//! This crate provides the player profile record, the typed player
//! identifier, and the unified error taxonomy used across all layers.

pub mod error;
pub mod id;
pub mod profile;
pub mod result;

pub use error::*;
pub use id::*;
pub use profile::*;
pub use result::*;
