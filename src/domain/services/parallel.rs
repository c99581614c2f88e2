//! Parallel asset graph resolver
//!
//! Resolution runs in two phases. Planning walks the declared dependencies
//! (calling only `Asset::dependencies`) and fails on a cycle before any
//! asset is loaded or generated. Execution then resolves the plan layer by
//! layer: every node of a layer depends only on earlier layers, so siblings
//! run concurrently and no thread ever waits on an in-flight node.
//!
//! When nodes fail, the reported failure is the one the depth-first
//! resolver would have hit first: the failed node earliest in depth-first
//! completion order. Execution continues only for nodes that complete
//! before it in that order, so the error chain matches `AssetGraph`.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use tracing::debug;

use crate::domain::entities::{AssetNode, NodeState, Origin};
use crate::domain::ports::{Asset, AssetCatalog, FileFetcher};
use crate::domain::services::plan::layered_sort;
use crate::domain::services::resolver::{load_or_generate, ResolveError, ResolvedGraph};
use crate::domain::services::Parents;
use crate::domain::value_objects::SessionContext;

type NodeTable<A> = Mutex<HashMap<<A as Asset>::Descriptor, AssetNode<A>>>;

/// Outcome of the planning phase
struct Plan<A: Asset> {
    /// Discovery (depth-first pre-) order
    discovered: Vec<A::Descriptor>,
    /// Depth-first completion order, the order `AssetGraph` resolves in
    completed: Vec<A::Descriptor>,
    assets: HashMap<A::Descriptor, A>,
    names: HashMap<A::Descriptor, String>,
    dependencies: HashMap<A::Descriptor, Vec<A::Descriptor>>,
    /// First dependent that requested each descriptor
    requested_by: HashMap<A::Descriptor, A::Descriptor>,
}

impl<A: Asset> Plan<A> {
    fn new() -> Self {
        Self {
            discovered: Vec::new(),
            completed: Vec::new(),
            assets: HashMap::new(),
            names: HashMap::new(),
            dependencies: HashMap::new(),
            requested_by: HashMap::new(),
        }
    }

    fn edges(&self) -> Vec<(A::Descriptor, A::Descriptor)> {
        self.discovered
            .iter()
            .flat_map(|dependent| {
                self.dependencies
                    .get(dependent)
                    .into_iter()
                    .flatten()
                    .filter(|dependency| self.names.contains_key(dependency))
                    .map(move |dependency| (*dependency, *dependent))
            })
            .collect()
    }

    /// Wrap a node failure with every ancestor up to the root
    fn wrap_with_ancestors(&self, failed: A::Descriptor, err: ResolveError) -> ResolveError {
        let mut err = err;
        let mut current = failed;
        while let Some(parent) = self.requested_by.get(&current) {
            let name = self.names.get(parent).map(String::as_str).unwrap_or_default();
            err = ResolveError::wrap(name, err);
            current = *parent;
        }
        err
    }
}

/// Asset graph that resolves independent subtrees concurrently
pub struct ParallelAssetGraph<'s, A: Asset, C> {
    catalog: C,
    context: &'s SessionContext,
    fetcher: &'s dyn FileFetcher,
    nodes: NodeTable<A>,
    order: Vec<A::Descriptor>,
    max_threads: usize,
}

impl<'s, A, C> ParallelAssetGraph<'s, A, C>
where
    A: Asset + Send + Sync,
    A::Descriptor: Send + Sync,
    C: AssetCatalog<A>,
{
    pub fn new(catalog: C, context: &'s SessionContext, fetcher: &'s dyn FileFetcher) -> Self {
        let max_threads = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self {
            catalog,
            context,
            fetcher,
            nodes: Mutex::new(HashMap::new()),
            order: Vec::new(),
            max_threads,
        }
    }

    /// Cap the number of nodes resolved at the same time
    pub fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = max_threads.max(1);
        self
    }

    pub fn resolve(&mut self, root: A::Descriptor) -> Result<Arc<A>, ResolveError> {
        if let Some(instance) = self.resolved(root) {
            return Ok(instance);
        }

        let mut plan = Plan::new();
        self.discover(root, None, &mut plan, &mut Vec::new())?;

        let layers = layered_sort(&plan.discovered, &plan.edges()).map_err(|remaining| {
            ResolveError::CyclicDependency {
                chain: remaining.iter().map(ToString::to_string).collect(),
            }
        })?;

        {
            let mut table = lock(&self.nodes);
            for descriptor in &plan.discovered {
                let name = plan.names.get(descriptor).cloned().unwrap_or_default();
                let dependencies = plan.dependencies.remove(descriptor).unwrap_or_default();
                table.insert(*descriptor, AssetNode::new(name, dependencies));
            }
        }
        debug!(nodes = plan.discovered.len(), layers = layers.len(), "planned");

        let rank: HashMap<A::Descriptor, usize> = plan
            .completed
            .iter()
            .enumerate()
            .map(|(i, d)| (*d, i))
            .collect();
        let rank_of = |d: &A::Descriptor| rank.get(d).copied().unwrap_or(usize::MAX);

        // (rank, descriptor, error) of the earliest failure so far
        let mut failure: Option<(usize, A::Descriptor, ResolveError)> = None;

        for layer in layers {
            let bound = failure.as_ref().map_or(usize::MAX, |(r, _, _)| *r);
            let mut work: Vec<(A::Descriptor, A)> = layer
                .iter()
                .filter(|d| rank_of(*d) < bound)
                .filter_map(|d| plan.assets.remove(d).map(|asset| (*d, asset)))
                .collect();

            while !work.is_empty() {
                let take = self.max_threads.min(work.len());
                let batch: Vec<_> = work.drain(..take).collect();
                let results = self.run_batch(batch);

                for (descriptor, result) in results {
                    match result {
                        Ok(_) => self.order.push(descriptor),
                        Err(err) => {
                            let r = rank_of(&descriptor);
                            if failure.as_ref().map_or(true, |(bound, _, _)| r < *bound) {
                                failure = Some((r, descriptor, err));
                            }
                        }
                    }
                }

                if let Some((bound, _, _)) = &failure {
                    work.retain(|(d, _)| rank_of(d) < *bound);
                }
            }
        }

        if let Some((_, descriptor, err)) = failure {
            return Err(plan.wrap_with_ancestors(descriptor, err));
        }

        self.resolved(root).ok_or_else(|| ResolveError::PreviouslyFailed {
            asset: plan
                .names
                .get(&root)
                .cloned()
                .unwrap_or_else(|| root.to_string()),
        })
    }

    fn discover(
        &self,
        descriptor: A::Descriptor,
        parent: Option<A::Descriptor>,
        plan: &mut Plan<A>,
        stack: &mut Vec<A::Descriptor>,
    ) -> Result<(), ResolveError> {
        if stack.contains(&descriptor) {
            let chain = stack
                .iter()
                .chain(std::iter::once(&descriptor))
                .map(ToString::to_string)
                .collect();
            return Err(ResolveError::CyclicDependency { chain });
        }
        if plan.names.contains_key(&descriptor) {
            return Ok(());
        }
        {
            let table = lock(&self.nodes);
            if let Some(node) = table.get(&descriptor) {
                match node.state() {
                    NodeState::Resolved => return Ok(()),
                    NodeState::Failed | NodeState::InProgress => {
                        return Err(ResolveError::PreviouslyFailed {
                            asset: node.name().to_string(),
                        })
                    }
                    NodeState::Unvisited => {}
                }
            }
        }

        let asset = self.catalog.instantiate(descriptor);
        let dependencies = asset.dependencies();
        plan.names.insert(descriptor, asset.name().to_string());
        if let Some(parent) = parent {
            plan.requested_by.insert(descriptor, parent);
        }
        plan.discovered.push(descriptor);
        plan.dependencies.insert(descriptor, dependencies.clone());
        plan.assets.insert(descriptor, asset);

        stack.push(descriptor);
        for dependency in dependencies {
            self.discover(dependency, Some(descriptor), plan, stack)?;
        }
        stack.pop();
        plan.completed.push(descriptor);
        Ok(())
    }

    fn run_batch(
        &self,
        batch: Vec<(A::Descriptor, A)>,
    ) -> Vec<(A::Descriptor, Result<Arc<A>, ResolveError>)> {
        let nodes = &self.nodes;
        let context = self.context;
        let fetcher = self.fetcher;

        thread::scope(|scope| {
            let handles: Vec<_> = batch
                .into_iter()
                .map(|(descriptor, asset)| {
                    let handle =
                        scope.spawn(move || run_node(nodes, context, fetcher, descriptor, asset));
                    (descriptor, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(descriptor, handle)| {
                    let result = handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
                    (descriptor, result)
                })
                .collect()
        })
    }
}

/// Resolve one planned node whose dependencies are all resolved
fn run_node<A: Asset>(
    nodes: &NodeTable<A>,
    context: &SessionContext,
    fetcher: &dyn FileFetcher,
    descriptor: A::Descriptor,
    mut asset: A,
) -> Result<Arc<A>, ResolveError> {
    let parents = {
        let mut table = lock(nodes);
        let dependencies = match table.get_mut(&descriptor) {
            Some(node) if node.state() == NodeState::Unvisited => {
                node.begin();
                node.dependencies().to_vec()
            }
            _ => {
                return Err(ResolveError::PreviouslyFailed {
                    asset: asset.name().to_string(),
                })
            }
        };
        let entries = dependencies
            .into_iter()
            .filter_map(|dependency| {
                table
                    .get(&dependency)
                    .and_then(|node| node.instance().cloned())
                    .map(|instance| (dependency, instance))
            })
            .collect();
        Parents::new(entries)
    };

    let outcome = load_or_generate(&mut asset, &parents, context, fetcher);

    let mut table = lock(nodes);
    let node = table.get_mut(&descriptor);
    match (outcome, node) {
        (Ok(origin), Some(node)) => {
            let instance = Arc::new(asset);
            node.complete(Arc::clone(&instance), origin);
            Ok(instance)
        }
        (Ok(_), None) => Err(ResolveError::PreviouslyFailed {
            asset: asset.name().to_string(),
        }),
        (Err(err), node) => {
            if let Some(node) = node {
                node.fail();
            }
            Err(err)
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<A, C> ResolvedGraph<A> for ParallelAssetGraph<'_, A, C>
where
    A: Asset + Send + Sync,
    A::Descriptor: Send + Sync,
    C: AssetCatalog<A>,
{
    fn resolved(&self, descriptor: A::Descriptor) -> Option<Arc<A>> {
        lock(&self.nodes)
            .get(&descriptor)
            .and_then(|node| node.instance().cloned())
    }

    fn resolution_order(&self) -> &[A::Descriptor] {
        &self.order
    }

    fn state(&self, descriptor: A::Descriptor) -> NodeState {
        lock(&self.nodes)
            .get(&descriptor)
            .map(AssetNode::state)
            .unwrap_or(NodeState::Unvisited)
    }

    fn origin(&self, descriptor: A::Descriptor) -> Option<Origin> {
        lock(&self.nodes)
            .get(&descriptor)
            .and_then(AssetNode::origin)
    }
}
