//! Memoization and ordering contracts
//!
//! Within one session a descriptor is instantiated, loaded and generated at
//! most once, and every dependent observes fully populated dependencies.

use std::sync::Arc;

use crate::common::*;
use kindling::domain::ports::MissingFetcher;
use kindling::{AssetGraph, ParallelAssetGraph, ResolvedGraph, SessionContext};

/// CONTRACT: A shared dependency is generated exactly once
mod shared_dependency {
    use super::*;

    #[test]
    fn contract_sequential_generates_shared_dependency_once() {
        let catalog = diamond();
        let context = SessionContext::new();
        let mut graph = AssetGraph::new(catalog.clone(), &context, &MissingFetcher);

        let root = graph.resolve(4).unwrap();

        assert_eq!(root.output(), Some("4(2(1()),3(1()))"));
        assert_eq!(catalog.generate_count(1), 1);
        assert_eq!(catalog.load_count(1), 1);
    }

    #[test]
    fn contract_parallel_generates_shared_dependency_once() {
        let catalog = diamond();
        let context = SessionContext::new();
        let mut graph = ParallelAssetGraph::new(catalog.clone(), &context, &MissingFetcher);

        let root = graph.resolve(4).unwrap();

        assert_eq!(root.output(), Some("4(2(1()),3(1()))"));
        for node in catalog.nodes() {
            assert_eq!(catalog.generate_count(node), 1, "node {node}");
        }
    }
}

/// CONTRACT: Requests for one descriptor share one instance
mod shared_instance {
    use super::*;

    #[test]
    fn contract_sequential_returns_pointer_equal_instances() {
        let context = SessionContext::new();
        let mut graph = AssetGraph::new(diamond(), &context, &MissingFetcher);

        graph.resolve(4).unwrap();
        let first = graph.resolve(1).unwrap();
        let second = graph.resolve(1).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn contract_parallel_returns_pointer_equal_instances() {
        let catalog = diamond();
        let context = SessionContext::new();
        let mut graph = ParallelAssetGraph::new(catalog.clone(), &context, &MissingFetcher);

        let root = graph.resolve(4).unwrap();
        let again = graph.resolve(4).unwrap();
        let shared = graph.resolve(1).unwrap();

        assert!(Arc::ptr_eq(&root, &again));
        assert!(Arc::ptr_eq(&shared, &graph.resolved(1).unwrap()));
        assert_eq!(catalog.generate_count(4), 1);
    }
}

/// CONTRACT: Dependencies are resolved before their dependents
mod ordering {
    use super::*;

    #[test]
    fn contract_dependencies_precede_dependents() {
        let catalog = diamond();
        let context = SessionContext::new();
        let mut graph = AssetGraph::new(catalog.clone(), &context, &MissingFetcher);

        graph.resolve(4).unwrap();

        assert_eq!(catalog.generated(), vec![1, 2, 3, 4]);
        assert_eq!(graph.resolution_order(), &[1, 2, 3, 4]);
    }

    #[test]
    fn contract_parallel_order_respects_layers() {
        let catalog = diamond();
        let context = SessionContext::new();
        let mut graph = ParallelAssetGraph::new(catalog, &context, &MissingFetcher);

        graph.resolve(4).unwrap();

        let order = graph.resolution_order();
        assert_eq!(order.first(), Some(&1));
        assert_eq!(order.last(), Some(&4));
        assert_eq!(order.len(), 4);
    }
}
