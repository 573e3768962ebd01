//! Error types for ringcache

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Key not found
    #[error("record not found")]
    NotFound,

    /// Capacity must hold at least one entry
    #[error("invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),
}
