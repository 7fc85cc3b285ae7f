//! Path selectors: which node paths of a graph take part in scoring

use gpga_core::{entity_ids, unknown_focus, AncestorSearch, Graph, NodePath, PathExtractor, PathQuery};

use crate::error::MetricResult;

/// A node path, or two paths scored as one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathIds {
    Simple(NodePath),
    /// Entity path and unknown path that only meet at the root
    Joined(NodePath, NodePath),
}

impl PathIds {
    pub fn contains(&self, id: &str) -> bool {
        match self {
            PathIds::Simple(path) => path.iter().any(|n| n == id),
            PathIds::Joined(first, second) => {
                first.iter().chain(second.iter()).any(|n| n == id)
            }
        }
    }
}

/// Trait for path selection strategies
pub trait PathSelector: Send + Sync {
    /// Paths to score, as node ids from the top down
    fn select(&self, graph: &Graph) -> MetricResult<Vec<PathIds>>;
}

/// Every root-to-leaf path
#[derive(Debug, Clone, Copy, Default)]
pub struct AllPaths {
    query: PathQuery,
}

impl AllPaths {
    pub fn new(query: PathQuery) -> Self {
        Self { query }
    }
}

impl PathSelector for AllPaths {
    fn select(&self, graph: &Graph) -> MetricResult<Vec<PathIds>> {
        Ok(PathExtractor::extract(graph, &self.query)
            .into_iter()
            .map(PathIds::Simple)
            .collect())
    }
}

/// Root-to-leaf paths that go through the question focus or an entity
#[derive(Debug, Clone, Copy, Default)]
pub struct KbFilteredPaths {
    query: PathQuery,
}

impl KbFilteredPaths {
    pub fn new(query: PathQuery) -> Self {
        Self { query }
    }
}

impl PathSelector for KbFilteredPaths {
    fn select(&self, graph: &Graph) -> MetricResult<Vec<PathIds>> {
        let focus = unknown_focus(graph);
        let entities = entity_ids(graph)?;
        let paths: Vec<PathIds> = PathExtractor::extract(graph, &self.query)
            .into_iter()
            .filter(|path| {
                path.iter()
                    .any(|id| focus.ids.contains(id) || entities.contains(id))
            })
            .map(PathIds::Simple)
            .collect();
        tracing::trace!(
            "Kept {} paths through {} unknowns and {} entities",
            paths.len(),
            focus.ids.len(),
            entities.len()
        );
        Ok(paths)
    }
}

/// Paths linking each entity to each unknown.
///
/// When an entity only reaches the unknown through the root, the entity
/// path is paired with every root path of the unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct KbJoinedPaths;

impl PathSelector for KbJoinedPaths {
    fn select(&self, graph: &Graph) -> MetricResult<Vec<PathIds>> {
        let focus = unknown_focus(graph);
        let entities = entity_ids(graph)?;
        let search = AncestorSearch::new(graph);
        let root = graph.root();

        let mut selected = Vec::new();
        for unknown in &focus.ids {
            for entity in &entities {
                for path in search.paths(entity, &[unknown.as_str()])? {
                    let tip = path.last().map(String::as_str);
                    if tip != Some(unknown.as_str()) && tip == root {
                        for unknown_path in search.paths(unknown, &[])? {
                            selected.push(PathIds::Joined(
                                top_down(path.clone()),
                                top_down(unknown_path),
                            ));
                        }
                    } else {
                        selected.push(PathIds::Simple(top_down(path)));
                    }
                }
            }
        }
        Ok(selected)
    }
}

fn top_down(mut path: NodePath) -> NodePath {
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(path: &[&str]) -> NodePath {
        path.iter().map(|s| s.to_string()).collect()
    }

    /// "Where did Obama study?"
    fn question() -> Graph {
        Graph::new(vec![])
            .with_node("s", "study-01")
            .with_node("p", "person")
            .with_node("n", "name")
            .with_node("0", "Obama")
            .with_node("u", "amr-unknown")
            .with_node("l", "location")
            .with_edge("s", ":ARG0", "p")
            .with_edge("p", ":name", "n")
            .with_edge("n", ":op1", "0")
            .with_edge("s", ":location", "l")
            .with_edge("l", ":mod", "u")
            .with_root("s")
    }

    #[test]
    fn test_all_paths() {
        let paths = AllPaths::default().select(&question()).unwrap();
        assert_eq!(paths.len(), 5);
        assert!(paths.contains(&PathIds::Simple(ids(&["s", "p", "n", "0"]))));
    }

    #[test]
    fn test_kb_filtered_paths() {
        let graph = question().with_node("t", "today").with_edge("s", ":time", "t");
        let paths = KbFilteredPaths::default().select(&graph).unwrap();
        assert!(paths.iter().all(|p| p.contains("p") || p.contains("u")));
        assert!(!paths.contains(&PathIds::Simple(ids(&["s", "t"]))));
    }

    #[test]
    fn test_kb_joined_paths_meet_at_root() {
        let paths = KbJoinedPaths.select(&question()).unwrap();
        assert_eq!(
            paths,
            vec![PathIds::Joined(ids(&["s", "p"]), ids(&["s", "l", "u"]))]
        );
    }

    #[test]
    fn test_kb_joined_paths_direct() {
        let graph = Graph::new(vec![])
            .with_node("u", "amr-unknown")
            .with_node("c", "city")
            .with_node("n", "name")
            .with_edge("u", ":domain", "c")
            .with_edge("c", ":name", "n")
            .with_root("u");
        let paths = KbJoinedPaths.select(&graph).unwrap();
        assert_eq!(paths, vec![PathIds::Simple(ids(&["u", "c"]))]);
    }
}
