//! Fail-fast contracts
//!
//! The first failure aborts the session, the error names every asset on the
//! path from the root, and nothing is materialized.

use crate::common::*;
use kindling::domain::ports::MissingFetcher;
use kindling::infrastructure::DirectoryMaterializer;
use kindling::{
    AssetGraph, CancellationToken, GenerationError, KindlingError, NodeState, ParallelAssetGraph,
    ResolveError, ResolvedGraph, Session, SessionContext, SessionOptions,
};
use tempfile::tempdir;

/// CONTRACT: The error chain names the root and every intermediate asset
mod chain {
    use super::*;

    #[test]
    fn contract_sequential_chain_names_every_ancestor() {
        let catalog = chain_with_sibling().failing(3);
        let context = SessionContext::new();
        let mut graph = AssetGraph::new(catalog.clone(), &context, &MissingFetcher);

        let err = graph.resolve(1).unwrap_err();

        assert_eq!(err.asset_chain(), vec!["node-1", "node-2", "node-3"]);
        assert!(matches!(
            err.root_cause(),
            ResolveError::Generation {
                source: GenerationError::InvalidInput(_),
                ..
            }
        ));
        assert!(err.report().ends_with("invalid input: node-3 refused"));
    }

    #[test]
    fn contract_first_failure_in_depth_first_order_wins() {
        // node-2 and node-4 both fail; depth-first reaches node-2 first
        let context = SessionContext::new();
        let catalog = || chain_with_sibling().failing(2).failing(4);

        let sequential = AssetGraph::new(catalog(), &context, &MissingFetcher)
            .resolve(1)
            .unwrap_err();
        for threads in [1, 4] {
            let parallel = ParallelAssetGraph::new(catalog(), &context, &MissingFetcher)
                .with_max_threads(threads)
                .resolve(1)
                .unwrap_err();

            assert_eq!(sequential.asset_chain(), vec!["node-1", "node-2"]);
            assert_eq!(parallel.asset_chain(), sequential.asset_chain());
            assert_eq!(parallel.report(), sequential.report());
        }
    }

    #[test]
    fn contract_parallel_chain_names_every_ancestor() {
        let catalog = chain_with_sibling().failing(3);
        let context = SessionContext::new();
        let mut graph = ParallelAssetGraph::new(catalog, &context, &MissingFetcher);

        let err = graph.resolve(1).unwrap_err();

        assert_eq!(err.asset_chain(), vec!["node-1", "node-2", "node-3"]);
    }
}

/// CONTRACT: Sibling branches are not resolved after a failure
mod fail_fast {
    use super::*;

    #[test]
    fn contract_sibling_branch_is_never_generated() {
        let catalog = chain_with_sibling().failing(3);
        let context = SessionContext::new();
        let mut graph = AssetGraph::new(catalog.clone(), &context, &MissingFetcher);

        graph.resolve(1).unwrap_err();

        assert_eq!(catalog.generate_count(4), 0);
        assert_eq!(graph.state(4), NodeState::Unvisited);
        assert_eq!(graph.state(1), NodeState::Failed);
        assert!(graph.collect_files(1, true).is_empty());
    }

    #[test]
    fn contract_parallel_stops_after_the_failing_layer() {
        let catalog = chain_with_sibling().failing(3);
        let context = SessionContext::new();
        let mut graph = ParallelAssetGraph::new(catalog.clone(), &context, &MissingFetcher);

        graph.resolve(1).unwrap_err();

        assert_eq!(catalog.generate_count(2), 0);
        assert_eq!(catalog.generate_count(1), 0);
    }

    #[test]
    fn contract_parallel_reports_failed_node_by_name() {
        let catalog = chain_with_sibling().failing(3);
        let context = SessionContext::new();
        let mut graph = ParallelAssetGraph::new(catalog, &context, &MissingFetcher);

        graph.resolve(1).unwrap_err();
        let err = graph.resolve(2).unwrap_err();

        assert!(matches!(err, ResolveError::PreviouslyFailed { .. }));
        assert_eq!(err.asset_chain(), vec!["node-3"]);
    }
}

/// CONTRACT: Cancellation mid-session fails the in-flight node
mod cancellation {
    use super::*;

    #[test]
    fn contract_sequential_cancel_after_a_resolved_node() {
        let token = CancellationToken::new();
        let catalog = chain_with_sibling().cancelling(3, token.clone());
        let context = SessionContext::new().with_cancellation(token);
        let mut graph = AssetGraph::new(catalog.clone(), &context, &MissingFetcher);

        let err = graph.resolve(1).unwrap_err();

        assert!(err.is_cancelled());
        assert!(matches!(err.root_cause(), ResolveError::Cancelled { asset } if asset == "node-2"));
        assert_eq!(err.asset_chain(), vec!["node-1", "node-2"]);
        assert_eq!(graph.state(3), NodeState::Resolved);
        assert_eq!(graph.state(2), NodeState::Failed);
        assert_eq!(catalog.generate_count(2), 0);
        assert_eq!(catalog.generate_count(4), 0);
    }

    #[test]
    fn contract_parallel_cancel_after_a_resolved_node() {
        let token = CancellationToken::new();
        let catalog = chain_with_sibling().cancelling(3, token.clone());
        let context = SessionContext::new().with_cancellation(token);
        let mut graph = ParallelAssetGraph::new(catalog.clone(), &context, &MissingFetcher)
            .with_max_threads(1);

        let err = graph.resolve(1).unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(err.asset_chain(), vec!["node-1", "node-2"]);
        assert_eq!(graph.state(3), NodeState::Resolved);
        assert_eq!(catalog.generate_count(2), 0);
        assert_eq!(catalog.generate_count(1), 0);
    }
}

/// CONTRACT: A failed session writes no files
mod no_partial_output {
    use super::*;

    #[test]
    fn contract_failed_session_materializes_nothing() {
        for parallel in [false, true] {
            let dir = tempdir().unwrap();
            let catalog = chain_with_sibling().failing(3);
            let context = SessionContext::new();
            let materializer = DirectoryMaterializer::new(dir.path());

            let err = Session::new(catalog, &context, &MissingFetcher)
                .with_options(SessionOptions::new().with_subtree(true).with_parallel(parallel))
                .create::<SpyAsset>(1, &materializer)
                .unwrap_err();

            assert!(matches!(err, KindlingError::Resolve(_)));
            assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        }
    }
}
