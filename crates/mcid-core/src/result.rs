//! Result type alias for mcid operations.

use crate::McidError;

/// A specialized `Result` type for mcid operations.
pub type McidResult<T> = Result<T, McidError>;
