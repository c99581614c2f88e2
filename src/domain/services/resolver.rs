//! Asset graph resolver
//!
//! Resolves a root descriptor depth-first, in declaration order. Every
//! descriptor is instantiated, loaded or generated at most once per session;
//! re-entering a descriptor that is still in progress is a cycle and aborts
//! the session.

use std::collections::HashMap;
use std::error::Error as _;
use std::sync::Arc;

use tracing::debug;

use crate::domain::entities::{AssetNode, File, NodeState, Origin};
use crate::domain::ports::{Asset, AssetCatalog, FileFetcher, GenerationError, LoadError};
use crate::domain::services::Parents;
use crate::domain::value_objects::SessionContext;


#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A descriptor was requested while it was still being resolved
    #[error("cyclic dependency detected: {}", .chain.join(" -> "))]
    CyclicDependency { chain: Vec<String> },

    #[error("failed to resolve dependencies of \"{asset}\"")]
    DependencyFailed {
        asset: String,
        #[source]
        source: Box<ResolveError>,
    },

    #[error("failed to load \"{asset}\"")]
    Load {
        asset: String,
        #[source]
        source: LoadError,
    },

    #[error("failed to generate \"{asset}\"")]
    Generation {
        asset: String,
        #[source]
        source: GenerationError,
    },

    #[error("resolution of \"{asset}\" was cancelled")]
    Cancelled { asset: String },

    /// The descriptor already failed earlier in this session
    #[error("\"{asset}\" failed earlier in this session")]
    PreviouslyFailed { asset: String },
}

impl ResolveError {
    /// Asset names from the root of the session down to the failure
    ///
    /// For a cycle this is the descriptor chain that closes the loop.
    pub fn asset_chain(&self) -> Vec<&str> {
        let mut chain = Vec::new();
        let mut current = self;
        loop {
            match current {
                ResolveError::DependencyFailed { asset, source } => {
                    chain.push(asset.as_str());
                    current = &**source;
                }
                ResolveError::CyclicDependency { chain: cycle } => {
                    chain.extend(cycle.iter().map(String::as_str));
                    return chain;
                }
                ResolveError::Load { asset, .. }
                | ResolveError::Generation { asset, .. }
                | ResolveError::Cancelled { asset }
                | ResolveError::PreviouslyFailed { asset } => {
                    chain.push(asset.as_str());
                    return chain;
                }
            }
        }
    }

    /// The innermost resolver error, below every `DependencyFailed` layer
    pub fn root_cause(&self) -> &ResolveError {
        match self {
            ResolveError::DependencyFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self.root_cause(), ResolveError::CyclicDependency { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self.root_cause(),
            ResolveError::Cancelled { .. }
                | ResolveError::Generation {
                    source: GenerationError::Cancelled,
                    ..
                }
        )
    }

    /// One-line report of the whole causal chain
    pub fn report(&self) -> String {
        let mut report = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            report.push_str(": ");
            report.push_str(&err.to_string());
            source = err.source();
        }
        report
    }

    /// Add one layer of context; cycles already carry their full chain
    pub(crate) fn wrap(asset: &str, source: ResolveError) -> ResolveError {
        match source {
            cycle @ ResolveError::CyclicDependency { .. } => cycle,
            other => ResolveError::DependencyFailed {
                asset: asset.to_string(),
                source: Box::new(other),
            },
        }
    }
}

/// Read access to the outcome of a resolution session
pub trait ResolvedGraph<A: Asset> {
    /// The shared instance of a resolved descriptor
    fn resolved(&self, descriptor: A::Descriptor) -> Option<Arc<A>>;

    /// Resolved descriptors, dependencies before dependents
    fn resolution_order(&self) -> &[A::Descriptor];

    fn state(&self, descriptor: A::Descriptor) -> NodeState;

    fn origin(&self, descriptor: A::Descriptor) -> Option<Origin>;

    /// Files of `root`, or of every resolved node when `subtree` is set
    fn collect_files(&self, root: A::Descriptor, subtree: bool) -> Vec<File> {
        let descriptors: Vec<A::Descriptor> = if subtree {
            self.resolution_order().to_vec()
        } else {
            vec![root]
        };

        descriptors
            .into_iter()
            .filter_map(|d| self.resolved(d))
            .flat_map(|asset| {
                asset
                    .as_writable()
                    .map(|w| w.files().to_vec())
                    .unwrap_or_default()
            })
            .collect()
    }
}

/// Run the load-or-generate step for one node whose dependencies are resolved
pub(crate) fn load_or_generate<A: Asset>(
    asset: &mut A,
    parents: &Parents<A>,
    context: &SessionContext,
    fetcher: &dyn FileFetcher,
) -> Result<Origin, ResolveError> {
    let name = asset.name().to_string();

    if context.is_cancelled() {
        return Err(ResolveError::Cancelled { asset: name });
    }

    if let Some(writable) = asset.as_writable_mut() {
        match writable.load(fetcher) {
            Ok(true) => {
                debug!(asset = %name, "loaded from persisted state");
                return Ok(Origin::Loaded);
            }
            Ok(false) => {}
            Err(source) => return Err(ResolveError::Load { asset: name, source }),
        }
    }

    debug!(asset = %name, dependencies = parents.len(), "generating");
    asset
        .generate(parents, context)
        .map_err(|source| ResolveError::Generation { asset: name, source })?;
    Ok(Origin::Generated)
}

/// Single-threaded, depth-first asset graph
///
/// Owns the node table for one session. Resolve the root once; the graph
/// can then be inspected through [`ResolvedGraph`].
pub struct AssetGraph<'s, A: Asset, C> {
    catalog: C,
    context: &'s SessionContext,
    fetcher: &'s dyn FileFetcher,
    nodes: HashMap<A::Descriptor, AssetNode<A>>,
    stack: Vec<A::Descriptor>,
    order: Vec<A::Descriptor>,
}

impl<'s, A, C> AssetGraph<'s, A, C>
where
    A: Asset,
    C: AssetCatalog<A>,
{
    pub fn new(catalog: C, context: &'s SessionContext, fetcher: &'s dyn FileFetcher) -> Self {
        Self {
            catalog,
            context,
            fetcher,
            nodes: HashMap::new(),
            stack: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Resolve `descriptor` and, transitively, everything it depends on
    pub fn resolve(&mut self, descriptor: A::Descriptor) -> Result<Arc<A>, ResolveError> {
        if let Some(node) = self.nodes.get(&descriptor) {
            match node.state() {
                NodeState::Resolved => {
                    if let Some(instance) = node.instance() {
                        return Ok(Arc::clone(instance));
                    }
                }
                NodeState::InProgress => return Err(self.cycle(descriptor)),
                NodeState::Failed => {
                    return Err(ResolveError::PreviouslyFailed {
                        asset: node.name().to_string(),
                    })
                }
                NodeState::Unvisited => {}
            }
        }

        let mut asset = self.catalog.instantiate(descriptor);
        let name = asset.name().to_string();
        let dependencies = asset.dependencies();

        let mut node = AssetNode::new(name.clone(), dependencies.clone());
        node.begin();
        self.nodes.insert(descriptor, node);
        self.stack.push(descriptor);
        debug!(asset = %name, "visiting");

        let outcome = self.visit(&mut asset, &name, &dependencies);
        self.stack.pop();

        match outcome {
            Ok(origin) => {
                let instance = Arc::new(asset);
                if let Some(node) = self.nodes.get_mut(&descriptor) {
                    node.complete(Arc::clone(&instance), origin);
                }
                self.order.push(descriptor);
                Ok(instance)
            }
            Err(err) => {
                if let Some(node) = self.nodes.get_mut(&descriptor) {
                    node.fail();
                }
                Err(err)
            }
        }
    }

    fn visit(
        &mut self,
        asset: &mut A,
        name: &str,
        dependencies: &[A::Descriptor],
    ) -> Result<Origin, ResolveError> {
        let mut resolved = Vec::with_capacity(dependencies.len());
        for &dependency in dependencies {
            let instance = self
                .resolve(dependency)
                .map_err(|err| ResolveError::wrap(name, err))?;
            resolved.push((dependency, instance));
        }

        let parents = Parents::new(resolved);
        load_or_generate(asset, &parents, self.context, self.fetcher)
    }

    fn cycle(&self, repeated: A::Descriptor) -> ResolveError {
        let chain = self
            .stack
            .iter()
            .chain(std::iter::once(&repeated))
            .map(ToString::to_string)
            .collect();
        ResolveError::CyclicDependency { chain }
    }

    /// Declared dependencies of a visited node
    pub fn dependencies_of(&self, descriptor: A::Descriptor) -> Option<&[A::Descriptor]> {
        self.nodes.get(&descriptor).map(AssetNode::dependencies)
    }
}

impl<A, C> ResolvedGraph<A> for AssetGraph<'_, A, C>
where
    A: Asset,
    C: AssetCatalog<A>,
{
    fn resolved(&self, descriptor: A::Descriptor) -> Option<Arc<A>> {
        self.nodes
            .get(&descriptor)
            .and_then(|node| node.instance().cloned())
    }

    fn resolution_order(&self) -> &[A::Descriptor] {
        &self.order
    }

    fn state(&self, descriptor: A::Descriptor) -> NodeState {
        self.nodes
            .get(&descriptor)
            .map(AssetNode::state)
            .unwrap_or(NodeState::Unvisited)
    }

    fn origin(&self, descriptor: A::Descriptor) -> Option<Origin> {
        self.nodes.get(&descriptor).and_then(AssetNode::origin)
    }
}
