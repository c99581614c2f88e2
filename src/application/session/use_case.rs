//! Session Use Case
//!
//! Resolve a root asset with either resolver, collect its files, and
//! optionally materialize them. Nothing is written unless resolution of the
//! whole graph succeeded.

use tracing::{debug, info};

use crate::domain::entities::File;
use crate::domain::ports::{Asset, AssetCatalog, FileFetcher, MaterializeReport, Materializer};
use crate::domain::services::{AssetGraph, ParallelAssetGraph, ResolveError, ResolvedGraph};
use crate::domain::value_objects::SessionContext;
use crate::error::KindlingResult;

use super::options::SessionOptions;
use super::result::SessionOutput;

/// One resolution session over a catalog
pub struct Session<'s, C> {
    catalog: C,
    context: &'s SessionContext,
    fetcher: &'s dyn FileFetcher,
    options: SessionOptions,
}

impl<'s, C> Session<'s, C> {
    pub fn new(catalog: C, context: &'s SessionContext, fetcher: &'s dyn FileFetcher) -> Self {
        Self {
            catalog,
            context,
            fetcher,
            options: SessionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve `root` and collect the files to materialize
    pub fn run<A>(&self, root: A::Descriptor) -> Result<SessionOutput<A>, ResolveError>
    where
        A: Asset + Send + Sync,
        A::Descriptor: Send + Sync,
        C: AssetCatalog<A> + Clone,
    {
        debug!(
            root = %root,
            parallel = self.options.parallel,
            subtree = self.options.include_subtree,
            "starting session"
        );

        if self.options.parallel {
            let mut graph =
                ParallelAssetGraph::new(self.catalog.clone(), self.context, self.fetcher);
            if let Some(max_threads) = self.options.max_threads {
                graph = graph.with_max_threads(max_threads);
            }
            let instance = graph.resolve(root)?;
            Ok(self.output(&graph, root, instance))
        } else {
            let mut graph = AssetGraph::new(self.catalog.clone(), self.context, self.fetcher);
            let instance = graph.resolve(root)?;
            Ok(self.output(&graph, root, instance))
        }
    }

    /// Resolve `root` and write its files
    pub fn create<A>(
        &self,
        root: A::Descriptor,
        materializer: &dyn Materializer,
    ) -> KindlingResult<(SessionOutput<A>, MaterializeReport)>
    where
        A: Asset + Send + Sync,
        A::Descriptor: Send + Sync,
        C: AssetCatalog<A> + Clone,
    {
        let output = self.run(root)?;
        let report = materializer.materialize(&output.files)?;
        info!(root = %root, files = report.len(), "created assets");
        Ok((output, report))
    }

    fn output<A: Asset>(
        &self,
        graph: &dyn ResolvedGraph<A>,
        root: A::Descriptor,
        instance: std::sync::Arc<A>,
    ) -> SessionOutput<A> {
        let order = graph.resolution_order().to_vec();
        let origins = order
            .iter()
            .filter_map(|d| graph.origin(*d).map(|origin| (*d, origin)))
            .collect();
        let files: Vec<File> = graph.collect_files(root, self.options.include_subtree);

        SessionOutput {
            root: instance,
            files,
            order,
            origins,
        }
    }
}
