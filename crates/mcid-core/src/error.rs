//! Unified error types for all layers of the library.

use thiserror::Error;

/// Unified error type for mcid operations.
///
/// This enum covers caller mistakes, provider-side transient conditions,
/// and local faults. Transient provider conditions are never retried by
/// this library; callers decide how to react to them.
#[derive(Error, Debug)]
pub enum McidError {
    /// Absent or malformed caller input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The provider rejected the request with HTTP 429.
    ///
    /// Carries the provider's own message verbatim; never translated
    /// and never retried by this library.
    #[error("Rate limited by {service}: {message}")]
    RateLimited { service: String, message: String },

    /// The provider could not be reached or returned an unparseable payload.
    #[error("Service unavailable: {service} - {message}")]
    Unavailable { service: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl McidError {
    /// Creates an invalid-argument error.
    #[must_use]
    pub fn invalid_argument<T: Into<String>>(message: T) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates a rate-limited error carrying the provider message.
    #[must_use]
    pub fn rate_limited<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::RateLimited {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Creates an unavailable error for a provider.
    #[must_use]
    pub fn unavailable<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::Unavailable {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error reflects a transient provider condition.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Unavailable { .. })
    }

    /// Checks if this error is a rate-limit rejection.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Checks if this error is a provider unavailability.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Checks if this error is a caller mistake.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<serde_json::Error> for McidError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let invalid = McidError::invalid_argument("name cannot be empty");
        assert!(invalid.to_string().contains("name cannot be empty"));

        let limited = McidError::rate_limited("Mojang Public API", "slow down");
        assert!(limited.to_string().contains("Mojang Public API"));
        assert!(limited.to_string().contains("slow down"));

        let unavailable = McidError::unavailable("community v2", "connection refused");
        assert!(unavailable.to_string().contains("connection refused"));

        let internal = McidError::internal("oops");
        assert!(internal.to_string().contains("oops"));
    }

    #[test]
    fn test_transient_errors() {
        assert!(McidError::rate_limited("svc", "busy").is_transient());
        assert!(McidError::unavailable("svc", "down").is_transient());
        assert!(!McidError::invalid_argument("bad input").is_transient());
        assert!(!McidError::internal("bug").is_transient());
    }

    #[test]
    fn test_error_predicates() {
        assert!(McidError::rate_limited("svc", "busy").is_rate_limited());
        assert!(!McidError::rate_limited("svc", "busy").is_unavailable());
        assert!(McidError::unavailable("svc", "down").is_unavailable());
        assert!(McidError::invalid_argument("bad").is_invalid_argument());
        assert!(!McidError::configuration("bad file").is_invalid_argument());
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: McidError = parse_err.into();
        assert!(matches!(err, McidError::Internal(_)));
    }
}
