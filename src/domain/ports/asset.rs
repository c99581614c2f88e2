//! Asset port - the contract every node of the asset graph implements
//!
//! An asset declares the descriptors it depends on and computes its output
//! purely from the resolved instances of exactly those descriptors. Assets
//! that produce files also implement [`WritableAsset`], which adds the
//! ability to be reconstructed from previously persisted output.

use std::fmt;
use std::hash::Hash;

use crate::domain::entities::File;
use crate::domain::ports::file_fetcher::{FetchError, FileFetcher};
use crate::domain::services::Parents;
use crate::domain::value_objects::SessionContext;

/// Failure inside an asset's `generate`
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The asset asked for a dependency it did not declare
    #[error("dependency '{descriptor}' was not declared or not resolved")]
    MissingDependency { descriptor: String },

    /// A required input was absent or malformed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Output could not be encoded
    #[error("failed to serialize output: {0}")]
    Serialize(String),

    /// The session was cancelled while generating
    #[error("generation cancelled")]
    Cancelled,
}

/// Failure inside a writable asset's `load`
///
/// "Nothing persisted" is not an error: `load` reports it as `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Persisted data exists but cannot be decoded
    #[error("failed to parse '{name}': {message}")]
    Parse { name: String, message: String },

    /// Persisted data was written by an incompatible format version
    #[error("'{name}' has format version {found}, expected {expected}")]
    VersionMismatch {
        name: String,
        found: String,
        expected: String,
    },
}

/// A unit of work in the asset graph
pub trait Asset: Sized {
    /// Stable identity used as the memoization key within a session
    type Descriptor: Copy + Eq + Hash + Ord + fmt::Debug + fmt::Display;

    /// The descriptor this instance was created for
    fn descriptor(&self) -> Self::Descriptor;

    /// Human-readable identity, used only for diagnostics
    fn name(&self) -> &str;

    /// Declared dependencies, in resolution order
    ///
    /// Must be pure and stable: no I/O, same answer on every call.
    fn dependencies(&self) -> Vec<Self::Descriptor>;

    /// Compute this asset's output from its resolved dependencies
    ///
    /// Called at most once per instance, and only after every declared
    /// dependency is resolved.
    fn generate(
        &mut self,
        parents: &Parents<Self>,
        context: &SessionContext,
    ) -> Result<(), GenerationError>;

    /// The writable facet, if this asset produces files
    fn as_writable(&self) -> Option<&dyn WritableAsset> {
        None
    }

    /// Mutable access to the writable facet, used to `load`
    fn as_writable_mut(&mut self) -> Option<&mut dyn WritableAsset> {
        None
    }
}

/// An asset whose output can be materialized and reloaded
pub trait WritableAsset {
    /// Files this asset contributes (empty for pure intermediate data)
    fn files(&self) -> &[File];

    /// Rebuild state from persisted output without consulting dependencies
    ///
    /// `Ok(false)` means nothing was persisted and the asset must be
    /// generated. Any error is fatal for the node. The default does not
    /// support loading.
    fn load(&mut self, fetcher: &dyn FileFetcher) -> Result<bool, LoadError> {
        let _ = fetcher;
        Ok(false)
    }
}

/// Creates asset instances for descriptors
pub trait AssetCatalog<A: Asset> {
    fn instantiate(&self, descriptor: A::Descriptor) -> A;
}

/// Fetch a persisted file, mapping "not found" to `None`
///
/// Every other fetch failure is a fatal [`LoadError`].
pub fn fetch_optional(fetcher: &dyn FileFetcher, name: &str) -> Result<Option<File>, LoadError> {
    match fetcher.fetch_by_name(name) {
        Ok(file) => Ok(Some(file)),
        Err(FetchError::NotFound(_)) => Ok(None),
        Err(err) => Err(LoadError::Fetch(err)),
    }
}
