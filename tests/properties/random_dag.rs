//! Property tests for resolution over random acyclic graphs.

use std::collections::{BTreeMap, HashMap};

use proptest::prelude::*;

use crate::common::*;
use kindling::domain::ports::MissingFetcher;
use kindling::{AssetGraph, ParallelAssetGraph, ResolvedGraph, SessionContext};

/// Node `i` may only depend on nodes `j < i`, so every graph is acyclic.
/// The root is the highest node and depends on every node without a
/// dependent, so the whole graph is reachable from it.
fn dag() -> impl Strategy<Value = BTreeMap<u32, Vec<u32>>> {
    (2u32..=12)
        .prop_flat_map(|n| {
            let rows: Vec<_> = (0..n)
                .map(|i| proptest::collection::vec(0..i.max(1), 0..=(i as usize).min(3)))
                .collect();
            (Just(n), rows)
        })
        .prop_map(|(n, rows)| {
            let mut edges = BTreeMap::new();
            for (i, mut deps) in rows.into_iter().enumerate() {
                let i = i as u32;
                deps.retain(|d| *d < i);
                deps.sort_unstable();
                deps.dedup();
                edges.insert(i, deps);
            }

            let root = n;
            let mut has_dependent = vec![false; n as usize];
            for deps in edges.values() {
                for d in deps {
                    has_dependent[*d as usize] = true;
                }
            }
            let sinks = (0..n).filter(|i| !has_dependent[*i as usize]).collect();
            edges.insert(root, sinks);
            edges
        })
}

fn root_of(edges: &BTreeMap<u32, Vec<u32>>) -> u32 {
    edges.keys().copied().max().unwrap_or_default()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Every reachable node is generated exactly once.
    #[test]
    fn property_each_node_generated_once(edges in dag()) {
        let catalog = SpyCatalog::from_map(edges.clone());
        let context = SessionContext::new();
        let mut graph = AssetGraph::new(catalog.clone(), &context, &MissingFetcher);

        graph.resolve(root_of(&edges)).unwrap();

        for node in edges.keys() {
            prop_assert_eq!(catalog.generate_count(*node), 1, "node {}", node);
        }
    }

    /// PROPERTY: Every dependency is generated before its dependents.
    #[test]
    fn property_dependencies_before_dependents(edges in dag()) {
        let catalog = SpyCatalog::from_map(edges.clone());
        let context = SessionContext::new();
        let mut graph = ParallelAssetGraph::new(catalog.clone(), &context, &MissingFetcher)
            .with_max_threads(4);

        graph.resolve(root_of(&edges)).unwrap();

        let position: HashMap<u32, usize> = catalog
            .generated()
            .into_iter()
            .enumerate()
            .map(|(i, node)| (node, i))
            .collect();
        for (node, deps) in &edges {
            for dep in deps {
                prop_assert!(
                    position[dep] < position[node],
                    "{} generated after its dependent {}", dep, node
                );
            }
        }
    }

    /// PROPERTY: Parallel and sequential resolution produce identical outputs.
    #[test]
    fn property_parallel_matches_sequential(edges in dag(), threads in 1usize..=4) {
        let root = root_of(&edges);
        let context = SessionContext::new();

        let mut sequential =
            AssetGraph::new(SpyCatalog::from_map(edges.clone()), &context, &MissingFetcher);
        let mut parallel =
            ParallelAssetGraph::new(SpyCatalog::from_map(edges.clone()), &context, &MissingFetcher)
                .with_max_threads(threads);

        let a = sequential.resolve(root).unwrap();
        let b = parallel.resolve(root).unwrap();

        prop_assert_eq!(a.output(), b.output());
        prop_assert_eq!(
            sequential.collect_files(root, true).len(),
            parallel.collect_files(root, true).len()
        );
        for node in edges.keys() {
            prop_assert_eq!(
                sequential.resolved(*node).and_then(|x| x.output().map(str::to_string)),
                parallel.resolved(*node).and_then(|x| x.output().map(str::to_string))
            );
        }
    }
}
