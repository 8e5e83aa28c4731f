//! Error types for feature configuration
//!
//! Feature lookups never fail: missing configuration resolves to "disabled".
//! Errors only appear where configuration enters the system, that is when a
//! registry is built, a seed document is parsed or a store backend breaks.

use thiserror::Error;

use crate::features::FeatureId;

/// Feature configuration error types.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// The same feature ID appears twice in a registry
    #[error("Duplicate feature in registry: {0}")]
    DuplicateFeature(FeatureId),

    /// A descriptor lists no roles at all
    #[error("Feature {0} has no allowed roles")]
    NoAllowedRoles(FeatureId),

    /// A feature key that does not name a known feature
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },

    /// Seed document could not be read or written
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Seed file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store backend failure
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type for feature configuration operations.
pub type FeatureResult<T> = Result<T, FeatureError>;

impl FeatureError {
    /// Get error code for API responses and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            FeatureError::DuplicateFeature(_) => "DUPLICATE_FEATURE",
            FeatureError::NoAllowedRoles(_) => "NO_ALLOWED_ROLES",
            FeatureError::UnknownFeature(_) => "UNKNOWN_FEATURE",
            FeatureError::InvalidConfig { .. } => "INVALID_CONFIG",
            FeatureError::Serialization(_) => "SERIALIZATION_ERROR",
            FeatureError::Io(_) => "IO_ERROR",
            FeatureError::Store(_) => "STORE_ERROR",
        }
    }

    /// Check if this error comes from the backend rather than from bad input.
    pub fn is_server_error(&self) -> bool {
        matches!(self, FeatureError::Store(_) | FeatureError::Io(_))
    }
}
