//! Root-to-leaf path extraction

use crate::graph::Graph;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Ordered node ids from the root (or an ancestor) down to a leaf
pub type NodePath = Vec<String>;

/// Path extraction policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathQuery {
    /// Keep a re-entrant node only under its primary parent
    #[serde(default)]
    pub suppress_reentrancy: bool,
}

impl PathQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suppress_reentrancy(mut self, suppress: bool) -> Self {
        self.suppress_reentrancy = suppress;
        self
    }
}

/// Depth-first path extractor
///
/// Every edge is consumed at most once: each node keeps a cursor into its
/// child list that is shared by all visits, and children are taken from the
/// last to the first. A path is emitted each time its tip runs out of
/// children, so intermediate prefixes are emitted as well. Children already on
/// the current path are skipped, which keeps paths simple on cyclic graphs.
pub struct PathExtractor;

impl PathExtractor {
    pub fn extract(graph: &Graph, query: &PathQuery) -> Vec<NodePath> {
        let Some(root) = graph.root() else {
            tracing::debug!("Graph has no root, no paths extracted");
            return Vec::new();
        };

        let children = Self::child_lists(graph, query);
        let mut cursors: HashMap<&str, usize> = HashMap::new();
        let mut paths: Vec<NodePath> = Vec::new();
        let mut path: Vec<&str> = vec![root];

        while let Some(&tip) = path.last() {
            let siblings = children.get(tip).map(Vec::as_slice).unwrap_or(&[]);
            let remaining = cursors.entry(tip).or_insert(siblings.len());

            if *remaining > 0 {
                *remaining -= 1;
                let child = siblings[*remaining];
                if !path.contains(&child) {
                    path.push(child);
                }
            } else if path.len() == 1 {
                break;
            } else {
                paths.push(path.iter().map(|id| id.to_string()).collect());
                path.pop();
            }
        }

        tracing::debug!(
            "Extracted {} paths from {} edges (suppress_reentrancy={})",
            paths.len(),
            graph.edges().len(),
            query.suppress_reentrancy
        );
        paths
    }

    /// Child ids per parent in edge order, after the re-entrancy policy
    fn child_lists<'g>(graph: &'g Graph, query: &PathQuery) -> HashMap<&'g str, Vec<&'g str>> {
        let secondary: HashSet<(String, String)> = if query.suppress_reentrancy {
            graph
                .reentrancies()
                .into_iter()
                .flat_map(|reentrancy| {
                    graph
                        .parent_ids(&reentrancy.node)
                        .into_iter()
                        .filter(|parent| *parent != reentrancy.primary_parent)
                        .map(|parent| (parent.to_string(), reentrancy.node.clone()))
                        .collect::<Vec<_>>()
                })
                .collect()
        } else {
            HashSet::new()
        };

        let mut lists: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in graph.edges() {
            if secondary.contains(&(edge.source.clone(), edge.target.clone())) {
                continue;
            }
            lists
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
        }
        lists
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boy_wants_to_go() -> Graph {
        Graph::new(
            ["The", "boy", "wants", "to", "go"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        )
        .with_node("w", "want-01")
        .with_node("b", "boy")
        .with_node("g", "go-01")
        .with_edge("w", ":ARG0", "b")
        .with_edge("w", ":ARG1", "g")
        .with_edge("g", ":ARG0", "b")
        .with_root("w")
    }

    fn ids(paths: &[NodePath]) -> Vec<String> {
        paths.iter().map(|p| p.join(">")).collect()
    }

    #[test]
    fn test_reentrancy_suppressed() {
        let graph = boy_wants_to_go();
        let paths = PathExtractor::extract(&graph, &PathQuery::new().suppress_reentrancy(true));

        assert_eq!(ids(&paths), vec!["w>g", "w>b"]);
    }

    #[test]
    fn test_reentrancy_kept_emits_prefixes() {
        let graph = boy_wants_to_go();
        let paths = PathExtractor::extract(&graph, &PathQuery::new());

        assert_eq!(ids(&paths), vec!["w>g>b", "w>g", "w>b"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let graph = Graph::new(vec![])
            .with_node("a", "x")
            .with_node("b", "y")
            .with_edge("a", ":op1", "b")
            .with_edge("b", ":op1", "a")
            .with_edge("b", ":mod", "b")
            .with_root("a");

        let paths = PathExtractor::extract(&graph, &PathQuery::new());
        assert_eq!(ids(&paths), vec!["a>b"]);
    }

    #[test]
    fn test_root_only_and_missing_root() {
        let single = Graph::new(vec![]).with_node("a", "x").with_root("a");
        assert!(PathExtractor::extract(&single, &PathQuery::new()).is_empty());

        let rootless = Graph::new(vec![]).with_node("a", "x");
        assert!(PathExtractor::extract(&rootless, &PathQuery::new()).is_empty());
    }

    #[test]
    fn test_shared_cursor_consumes_each_edge_once() {
        // d is reached through b and c; its children are only walked once
        let graph = Graph::new(vec![])
            .with_node("a", "a")
            .with_node("b", "b")
            .with_node("c", "c")
            .with_node("d", "d")
            .with_node("e", "e")
            .with_edge("a", ":op1", "b")
            .with_edge("a", ":op2", "c")
            .with_edge("b", ":op1", "d")
            .with_edge("c", ":op1", "d")
            .with_edge("d", ":op1", "e")
            .with_root("a");

        let paths = PathExtractor::extract(&graph, &PathQuery::new());
        assert_eq!(
            ids(&paths),
            vec!["a>c>d>e", "a>c>d", "a>c", "a>b>d", "a>b"]
        );
    }
}
