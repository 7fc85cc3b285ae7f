//! Bottom-up search for ancestor paths

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::limits::MAX_ANCESTOR_ITERATIONS;
use crate::paths::NodePath;

/// Finds every simple upward path from a node to a set of targets or the root
pub struct AncestorSearch<'g> {
    graph: &'g Graph,
    limit: usize,
}

impl<'g> AncestorSearch<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            limit: MAX_ANCESTOR_ITERATIONS,
        }
    }

    /// Override the expansion cap
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Paths start at `start` and end at the first target or root reached.
    ///
    /// Candidates live on a stack; the top one is committed once its tip is a
    /// target or the root, otherwise it is replaced by one extension per
    /// parent that is not already on it.
    pub fn paths(&self, start: &str, targets: &[&str]) -> Result<Vec<NodePath>> {
        let root = self.graph.root();
        let is_finished =
            |path: &Vec<&str>| path.last().is_some_and(|tip| targets.contains(tip) || Some(*tip) == root);

        let mut candidates: Vec<Vec<&str>> = vec![vec![start]];
        let mut finished: Vec<NodePath> = Vec::new();
        let mut iterations = 0;

        loop {
            while candidates.last().is_some_and(is_finished) {
                if let Some(path) = candidates.pop() {
                    finished.push(path.into_iter().map(str::to_string).collect());
                }
            }

            let Some(path) = candidates.pop() else {
                break;
            };

            if iterations >= self.limit {
                tracing::warn!(
                    "Ancestor search from {} hit the cap with {} open candidates",
                    start,
                    candidates.len() + 1
                );
                return Err(Error::SearchLimitExceeded {
                    start: start.to_string(),
                    limit: self.limit,
                });
            }

            let Some(&tip) = path.last() else {
                continue;
            };
            let mut expanded: Vec<&str> = Vec::new();
            for parent in self.graph.parent_ids(tip) {
                // re-entrancy inside the same path
                if path.contains(&parent) || expanded.contains(&parent) {
                    continue;
                }
                expanded.push(parent);
                let mut extended = path.clone();
                extended.push(parent);
                candidates.push(extended);
            }
            iterations += 1;
        }

        Ok(finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Graph {
        // r -> a -> c, r -> b -> c, c -> d
        Graph::new(vec![])
            .with_node("r", "root")
            .with_node("a", "a")
            .with_node("b", "b")
            .with_node("c", "c")
            .with_node("d", "d")
            .with_edge("r", ":op1", "a")
            .with_edge("r", ":op2", "b")
            .with_edge("a", ":op1", "c")
            .with_edge("b", ":op1", "c")
            .with_edge("c", ":op1", "d")
            .with_root("r")
    }

    #[test]
    fn test_all_paths_to_root() {
        let graph = diamond();
        let paths = AncestorSearch::new(&graph).paths("d", &[]).unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths.contains(&vec!["d".into(), "c".into(), "b".into(), "r".into()]));
        assert!(paths.contains(&vec!["d".into(), "c".into(), "a".into(), "r".into()]));
    }

    #[test]
    fn test_stops_at_target() {
        let graph = diamond();
        let paths = AncestorSearch::new(&graph).paths("d", &["c"]).unwrap();

        assert_eq!(paths, vec![vec!["d".to_string(), "c".to_string()]]);
    }

    #[test]
    fn test_start_is_root() {
        let graph = diamond();
        let paths = AncestorSearch::new(&graph).paths("r", &[]).unwrap();
        assert_eq!(paths, vec![vec!["r".to_string()]]);
    }

    #[test]
    fn test_upward_cycle_terminates() {
        // a and b are each other's parent; neither reaches the root
        let graph = Graph::new(vec![])
            .with_node("r", "root")
            .with_node("a", "a")
            .with_node("b", "b")
            .with_edge("a", ":op1", "b")
            .with_edge("b", ":op1", "a")
            .with_root("r");

        let paths = AncestorSearch::new(&graph).paths("a", &[]).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn test_limit_exceeded_is_reported() {
        let graph = diamond();
        let result = AncestorSearch::new(&graph).with_limit(1).paths("d", &[]);

        assert_eq!(
            result,
            Err(Error::SearchLimitExceeded {
                start: "d".to_string(),
                limit: 1
            })
        );
    }
}
