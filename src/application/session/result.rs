//! Session Result

use std::sync::Arc;

use crate::domain::entities::{File, Origin};
use crate::domain::ports::Asset;

/// Outcome of a successful session
#[derive(Debug)]
pub struct SessionOutput<A: Asset> {
    /// The resolved root instance
    pub root: Arc<A>,
    /// Files to materialize, in resolution order
    pub files: Vec<File>,
    /// Every resolved descriptor, dependencies before dependents
    pub order: Vec<A::Descriptor>,
    /// How each resolved descriptor was produced
    pub origins: Vec<(A::Descriptor, Origin)>,
}

impl<A: Asset> SessionOutput<A> {
    pub fn loaded(&self) -> impl Iterator<Item = A::Descriptor> + '_ {
        self.origins
            .iter()
            .filter(|(_, origin)| *origin == Origin::Loaded)
            .map(|(descriptor, _)| *descriptor)
    }

    pub fn generated(&self) -> impl Iterator<Item = A::Descriptor> + '_ {
        self.origins
            .iter()
            .filter(|(_, origin)| *origin == Origin::Generated)
            .map(|(descriptor, _)| *descriptor)
    }
}
