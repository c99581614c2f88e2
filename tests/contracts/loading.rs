//! Load-before-generate contracts
//!
//! A writable asset that finds its persisted output is never generated, and
//! a failing load is fatal instead of falling back to generation.

use crate::common::*;
use kindling::infrastructure::MemoryFetcher;
use kindling::{
    AssetGraph, LoadError, Origin, ParallelAssetGraph, ResolveError, ResolvedGraph,
    SessionContext,
};

/// CONTRACT: Persisted output short-circuits generation
mod short_circuit {
    use super::*;

    #[test]
    fn contract_loaded_asset_is_never_generated() {
        let catalog = diamond();
        let fetcher = MemoryFetcher::new().with_file(persisted(2, "2(from disk)"));
        let context = SessionContext::new();
        let mut graph = AssetGraph::new(catalog.clone(), &context, &fetcher);

        let root = graph.resolve(4).unwrap();

        assert_eq!(catalog.generate_count(2), 0);
        assert_eq!(catalog.load_count(2), 1);
        assert_eq!(graph.origin(2), Some(Origin::Loaded));
        assert_eq!(root.output(), Some("4(2(from disk),3(1()))"));
    }

    #[test]
    fn contract_dependencies_of_loaded_asset_still_resolve_first() {
        let catalog = diamond();
        let fetcher = MemoryFetcher::new().with_file(persisted(4, "4(cached)"));
        let context = SessionContext::new();
        let mut graph = ParallelAssetGraph::new(catalog.clone(), &context, &fetcher);

        let root = graph.resolve(4).unwrap();

        assert_eq!(root.output(), Some("4(cached)"));
        assert_eq!(catalog.generate_count(4), 0);
        assert_eq!(catalog.generate_count(1), 1);
        assert_eq!(graph.origin(1), Some(Origin::Generated));
    }
}

/// CONTRACT: A failing load never falls back to generate
mod load_failure {
    use super::*;

    #[test]
    fn contract_corrupt_state_is_fatal() {
        let catalog = diamond().corrupt(1);
        let fetcher = MemoryFetcher::new();
        let context = SessionContext::new();
        let mut graph = AssetGraph::new(catalog.clone(), &context, &fetcher);

        let err = graph.resolve(4).unwrap_err();

        assert_eq!(catalog.generate_count(1), 0);
        assert!(matches!(
            err.root_cause(),
            ResolveError::Load {
                source: LoadError::Parse { .. },
                ..
            }
        ));
        assert_eq!(err.asset_chain(), vec!["node-4", "node-2", "node-1"]);
    }
}
