//! FileFetcher port - read-only access to previously persisted artifacts
//!
//! Writable assets consult a fetcher in `load`. A missing artifact must be
//! distinguishable from every other failure, so that the asset can fall back
//! to generation instead of aborting the session.

use crate::domain::entities::File;

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors raised while fetching a persisted artifact
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Nothing persisted under this name (not fatal: generate instead)
    #[error("persisted artifact not found: {0}")]
    NotFound(String),

    /// Name is not a destination-relative path
    #[error("invalid artifact name '{0}'")]
    InvalidName(String),

    /// Any other I/O failure
    #[error("failed to read persisted artifact '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Whether this is the recoverable "not found" signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

/// Read-only store of persisted artifacts
///
/// Implementations:
/// - `DirectoryFetcher` - reads from an asset directory
/// - `MemoryFetcher` - in-memory, for tests and embedding
/// - `MissingFetcher` - nothing persisted, always generate
pub trait FileFetcher: Send + Sync {
    /// Fetch an artifact by its destination-relative name
    fn fetch_by_name(&self, name: &str) -> FetchResult<File>;
}

/// Fetcher with no persisted state
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingFetcher;

impl FileFetcher for MissingFetcher {
    fn fetch_by_name(&self, name: &str) -> FetchResult<File> {
        Err(FetchError::NotFound(name.to_string()))
    }
}
