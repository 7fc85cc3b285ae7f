//! Property tests for the traversal algorithms on arbitrary (cyclic) graphs

use gpga_core::{AncestorSearch, Error, Graph, PathExtractor, PathQuery};
use proptest::prelude::*;
use std::collections::HashSet;

/// Random graph over nodes n0..n{size}; edges may form cycles and self-loops
fn graph_strategy() -> impl Strategy<Value = Graph> {
    (2usize..9).prop_flat_map(|size| {
        let edge = (0..size, 0..size, 0usize..3);
        prop::collection::vec(edge, 1..20).prop_map(move |edges| {
            let mut graph = Graph::new(vec![]);
            for index in 0..size {
                graph = graph.with_node(format!("n{}", index), format!("concept-{}", index));
            }
            for (source, target, role) in edges {
                graph = graph.with_edge(
                    format!("n{}", source),
                    format!(":ARG{}", role),
                    format!("n{}", target),
                );
            }
            graph.with_root("n0")
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn extracted_paths_are_simple(graph in graph_strategy(), suppress in any::<bool>()) {
        let paths = PathExtractor::extract(&graph, &PathQuery::new().suppress_reentrancy(suppress));
        for path in &paths {
            let unique: HashSet<&String> = path.iter().collect();
            prop_assert_eq!(unique.len(), path.len());
            prop_assert_eq!(path.first().map(String::as_str), Some("n0"));
        }
        // every edge is consumed at most once
        prop_assert!(paths.len() <= graph.edges().len());
    }

    #[test]
    fn suppressed_reentrancy_has_single_entry(graph in graph_strategy()) {
        let paths = PathExtractor::extract(&graph, &PathQuery::new().suppress_reentrancy(true));
        for reentrancy in graph.reentrancies() {
            let predecessors: HashSet<&String> = paths
                .iter()
                .filter_map(|path| {
                    let position = path.iter().position(|id| *id == reentrancy.node)?;
                    position.checked_sub(1).map(|p| &path[p])
                })
                .collect();
            prop_assert!(predecessors.len() <= 1);
            if let Some(parent) = predecessors.into_iter().next() {
                prop_assert_eq!(parent, &reentrancy.primary_parent);
            }
        }
    }

    #[test]
    fn ancestor_paths_are_simple_or_capped(graph in graph_strategy(), start in 0usize..8) {
        let start = format!("n{}", start);
        match AncestorSearch::new(&graph).paths(&start, &[]) {
            Ok(paths) => {
                for path in paths {
                    let unique: HashSet<&String> = path.iter().collect();
                    prop_assert_eq!(unique.len(), path.len());
                    prop_assert_eq!(path.last().map(String::as_str), Some("n0"));
                    prop_assert_eq!(&path[0], &start);
                }
            }
            Err(Error::SearchLimitExceeded { limit, .. }) => prop_assert_eq!(limit, 1000),
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }
}
