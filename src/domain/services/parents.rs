//! Resolved-dependency view handed to `Asset::generate`

use std::sync::Arc;

use crate::domain::ports::{Asset, GenerationError};

/// Read-only snapshot of an asset's resolved, declared dependencies
///
/// Contains exactly the descriptors the asset declared, in declaration
/// order, never the rest of the graph. Concrete asset sets add typed
/// accessors on top of [`Parents::get`].
pub struct Parents<A: Asset> {
    entries: Vec<(A::Descriptor, Arc<A>)>,
}

impl<A: Asset> Parents<A> {
    pub(crate) fn new(entries: Vec<(A::Descriptor, Arc<A>)>) -> Self {
        Self { entries }
    }

    /// An empty view, for assets without dependencies
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The resolved instance for a declared dependency
    pub fn get(&self, descriptor: A::Descriptor) -> Result<&A, GenerationError> {
        self.entries
            .iter()
            .find(|(d, _)| *d == descriptor)
            .map(|(_, asset)| asset.as_ref())
            .ok_or_else(|| GenerationError::MissingDependency {
                descriptor: descriptor.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
