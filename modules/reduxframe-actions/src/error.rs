//! Typed errors for creator and registry construction.

use thiserror::Error;

/// Errors raised while building creators and registries.
///
/// Everything here is a setup-time failure. Dispatch never produces one of
/// these; unknown tags pass through instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A creator was given an empty tag
    #[error("action tag must not be empty")]
    EmptyTag,

    /// A transform was registered under an empty local key
    #[error("local key must not be empty")]
    EmptyLocalKey,

    /// Two local keys derive the same wire tag
    #[error("tag collision on {tag:?}: {incoming:?} would shadow {existing:?}")]
    TagCollision {
        tag: String,
        existing: String,
        incoming: String,
    },

    /// Separator from config is unusable
    #[error("invalid namespace separator: {0:?}")]
    InvalidSeparator(String),
}

/// Result type alias for registry construction.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
