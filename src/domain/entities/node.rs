//! AssetNode entity - one vertex of the asset graph and its resolution state

use std::sync::Arc;

use crate::domain::ports::Asset;

/// Resolution state of a node within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Unvisited,
    InProgress,
    Resolved,
    Failed,
}

/// How a resolved node obtained its output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Reconstructed from persisted state
    Loaded,
    /// Computed from dependencies
    Generated,
}

/// A node in the asset graph
///
/// Holds the declared dependencies and, once resolved, the shared instance.
/// State only moves forward: `Unvisited -> InProgress -> Resolved | Failed`.
#[derive(Debug)]
pub struct AssetNode<A: Asset> {
    name: String,
    state: NodeState,
    dependencies: Vec<A::Descriptor>,
    instance: Option<Arc<A>>,
    origin: Option<Origin>,
}

impl<A: Asset> AssetNode<A> {
    pub fn new(name: impl Into<String>, dependencies: Vec<A::Descriptor>) -> Self {
        Self {
            name: name.into(),
            state: NodeState::Unvisited,
            dependencies,
            instance: None,
            origin: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn dependencies(&self) -> &[A::Descriptor] {
        &self.dependencies
    }

    /// The resolved instance, present only in the `Resolved` state
    pub fn instance(&self) -> Option<&Arc<A>> {
        self.instance.as_ref()
    }

    pub fn origin(&self) -> Option<Origin> {
        self.origin
    }

    /// `Unvisited -> InProgress`
    pub fn begin(&mut self) {
        debug_assert_eq!(self.state, NodeState::Unvisited);
        self.state = NodeState::InProgress;
    }

    /// `InProgress -> Resolved`
    pub fn complete(&mut self, instance: Arc<A>, origin: Origin) {
        debug_assert_eq!(self.state, NodeState::InProgress);
        self.state = NodeState::Resolved;
        self.instance = Some(instance);
        self.origin = Some(origin);
    }

    /// `InProgress -> Failed`
    pub fn fail(&mut self) {
        debug_assert_eq!(self.state, NodeState::InProgress);
        self.state = NodeState::Failed;
    }
}
