//! Cycle detection contracts
//!
//! A cycle aborts the session before any asset in it is generated, and the
//! error names the descriptors that close the loop.

use crate::common::*;
use kindling::domain::ports::MissingFetcher;
use kindling::{AssetGraph, ParallelAssetGraph, ResolveError, SessionContext};

fn cyclic() -> SpyCatalog {
    SpyCatalog::from_edges(&[(1, &[2]), (2, &[3]), (3, &[4, 2]), (4, &[])])
}

fn chain(err: &ResolveError) -> Vec<String> {
    match err {
        ResolveError::CyclicDependency { chain } => chain.clone(),
        other => panic!("expected a cycle, got {other:?}"),
    }
}

/// CONTRACT: The sequential resolver reports the cycle path
mod sequential {
    use super::*;

    #[test]
    fn contract_cycle_is_reported_with_its_path() {
        let catalog = cyclic();
        let context = SessionContext::new();
        let mut graph = AssetGraph::new(catalog.clone(), &context, &MissingFetcher);

        let err = graph.resolve(1).unwrap_err();

        assert_eq!(chain(&err), vec!["1", "2", "3", "2"]);
        assert!(err.to_string().contains("1 -> 2 -> 3 -> 2"));
    }

    #[test]
    fn contract_no_node_on_the_cycle_is_generated() {
        let catalog = cyclic();
        let context = SessionContext::new();
        let mut graph = AssetGraph::new(catalog.clone(), &context, &MissingFetcher);

        graph.resolve(1).unwrap_err();

        assert_eq!(catalog.generate_count(1), 0);
        assert_eq!(catalog.generate_count(2), 0);
        assert_eq!(catalog.generate_count(3), 0);
    }
}

/// CONTRACT: The parallel resolver detects cycles while planning
mod parallel {
    use super::*;

    #[test]
    fn contract_cycle_is_found_before_any_work() {
        let catalog = cyclic();
        let context = SessionContext::new();
        let mut graph = ParallelAssetGraph::new(catalog.clone(), &context, &MissingFetcher);

        let err = graph.resolve(1).unwrap_err();

        assert_eq!(chain(&err), vec!["1", "2", "3", "2"]);
        assert!(catalog.calls().is_empty());
    }

    #[test]
    fn contract_self_dependency_is_a_cycle() {
        let catalog = SpyCatalog::from_edges(&[(7, &[7])]);
        let context = SessionContext::new();
        let mut graph = ParallelAssetGraph::new(catalog.clone(), &context, &MissingFetcher);

        let err = graph.resolve(7).unwrap_err();

        assert_eq!(chain(&err), vec!["7", "7"]);
        assert!(catalog.calls().is_empty());
    }
}
