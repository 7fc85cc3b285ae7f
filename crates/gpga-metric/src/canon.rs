//! Path rendering and canonicalization
//!
//! A rendered path alternates node labels and edge labels, e.g.
//! `want-01 :ARG0 boy`. The canonical set of a graph drops paths that are a
//! prefix of another kept path, merges the name strings of each entity into
//! one path and is sorted in descending order.

use std::collections::{BTreeMap, HashMap};

use gpga_core::limits::{MISSING_LABEL, NAME_CONCEPT, NAME_ROLE};
use gpga_core::Graph;
use serde::{Deserialize, Serialize};

use crate::selector::PathIds;

/// Separator between the two halves of a joined path
pub const JOIN_SEPARATOR: &str = " + ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonOptions {
    /// Merge entity names without the entity type in front of `:name`
    #[serde(default)]
    pub ignore_entity_types: bool,
}

impl CanonOptions {
    pub fn ignore_entity_types(mut self, ignore: bool) -> Self {
        self.ignore_entity_types = ignore;
        self
    }
}

/// Render paths over one graph
pub struct PathRenderer<'g> {
    graph: &'g Graph,
    /// Relation between two adjacent nodes; the last edge wins for parallel edges
    relations: HashMap<(&'g str, &'g str), &'g str>,
}

impl<'g> PathRenderer<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let relations = graph
            .edges()
            .iter()
            .map(|e| ((e.source.as_str(), e.target.as_str()), e.label.as_str()))
            .collect();
        Self { graph, relations }
    }

    pub fn render(&self, path: &PathIds) -> String {
        match path {
            PathIds::Simple(ids) => self.render_ids(ids),
            PathIds::Joined(first, second) => {
                format!("{}{}{}", self.render_ids(first), JOIN_SEPARATOR, self.render_ids(second))
            }
        }
    }

    fn render_ids(&self, ids: &[String]) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(ids.len() * 2);
        for (position, id) in ids.iter().enumerate() {
            if position > 0 {
                let relation = self
                    .relations
                    .get(&(ids[position - 1].as_str(), id.as_str()))
                    .copied()
                    .unwrap_or(MISSING_LABEL);
                parts.push(relation);
            }
            parts.push(self.graph.label(id));
        }
        parts.join(" ")
    }
}

/// Canonical path strings of a graph for the given node paths
pub fn canonical_paths(graph: &Graph, paths: &[PathIds], options: CanonOptions) -> Vec<String> {
    let renderer = PathRenderer::new(graph);
    canonicalize(paths.iter().map(|p| renderer.render(p)).collect(), options)
}

/// Prefix deduplication, entity trunking and descending sort
pub fn canonicalize(rendered: Vec<String>, options: CanonOptions) -> Vec<String> {
    let unique = drop_prefixes(rendered);
    let mut canonical = drop_prefixes(trunk_entities(unique, options));
    canonical.sort_unstable_by(|a, b| b.cmp(a));
    canonical
}

/// Keep a path only if no longer kept path starts with it.
///
/// Paths are visited by token count, longest first, ties by descending
/// string so the result does not depend on input order.
fn drop_prefixes(mut paths: Vec<String>) -> Vec<String> {
    paths.sort_by(|a, b| {
        token_count(b)
            .cmp(&token_count(a))
            .then_with(|| b.cmp(a))
    });
    let mut kept: Vec<String> = Vec::with_capacity(paths.len());
    for path in paths {
        if !kept.iter().any(|k| k.starts_with(path.as_str())) {
            kept.push(path);
        }
    }
    kept
}

fn token_count(path: &str) -> usize {
    path.split_whitespace().count()
}

/// Merge `... :name name :opN "value"` paths of the same entity into
/// `... :name "value1 value2"`, values ordered by `N`
fn trunk_entities(paths: Vec<String>, options: CanonOptions) -> Vec<String> {
    let mut plain = Vec::new();
    let mut trunks: BTreeMap<String, Vec<(usize, String, String)>> = BTreeMap::new();

    for path in paths {
        let items: Vec<&str> = path.split_whitespace().collect();
        let count = items.len();
        let is_name_leaf = count >= 4
            && items[count - 4] == NAME_ROLE
            && items[count - 3] == NAME_CONCEPT;
        if !is_name_leaf {
            plain.push(path);
            continue;
        }

        let key = if options.ignore_entity_types {
            let mut key: Vec<&str> = items[..count.saturating_sub(5)].to_vec();
            key.push(NAME_ROLE);
            key.join(" ")
        } else {
            items[..count - 3].join(" ")
        };
        let role = items[count - 2];
        trunks.entry(key).or_default().push((
            op_index(role),
            role.to_string(),
            items[count - 1].replace('"', ""),
        ));
    }

    for (key, mut leaves) in trunks {
        leaves.sort();
        let value: Vec<&str> = leaves.iter().map(|(_, _, v)| v.as_str()).collect();
        plain.push(format!("{} \"{}\"", key, value.join(" ")));
    }
    plain
}

/// Numeric part of an `:opN` role
fn op_index(role: &str) -> usize {
    role.strip_prefix(":op")
        .and_then(|n| n.parse().ok())
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|s| s.to_string()).collect()
    }

    fn ids(path: &[&str]) -> PathIds {
        PathIds::Simple(path.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_render() {
        let graph = Graph::new(vec![])
            .with_node("w", "want-01")
            .with_node("b", "boy")
            .with_edge("w", ":ARG0", "b")
            .with_root("w");
        let renderer = PathRenderer::new(&graph);

        assert_eq!(renderer.render(&ids(&["w", "b"])), "want-01 :ARG0 boy");
        assert_eq!(renderer.render(&ids(&["w"])), "want-01");
        assert_eq!(
            renderer.render(&PathIds::Joined(vec!["w".into()], vec!["w".into(), "b".into()])),
            "want-01 + want-01 :ARG0 boy"
        );
        assert_eq!(renderer.render(&ids(&["b", "w"])), "boy None want-01");
    }

    #[test]
    fn test_prefixes_dropped() {
        let canonical = canonicalize(
            strings(&["a :ARG0 b", "a", "a :ARG1 c", "a :ARG0 b :mod d"]),
            CanonOptions::default(),
        );
        assert_eq!(canonical, strings(&["a :ARG1 c", "a :ARG0 b :mod d"]));
    }

    #[test]
    fn test_entity_names_merged() {
        let canonical = canonicalize(
            strings(&[
                "m :ARG0 person :name name :op2 \"Obama\"",
                "m :ARG0 person :name name :op1 \"Barack\"",
                "m :ARG0 person :name name",
                "m :ARG1 city :name name :op10 \"X\"",
                "m :ARG1 city :name name :op2 \"Y\"",
            ]),
            CanonOptions::default(),
        );
        assert_eq!(
            canonical,
            strings(&["m :ARG1 city :name \"Y X\"", "m :ARG0 person :name \"Barack Obama\""])
        );
    }

    #[test]
    fn test_entity_types_ignored() {
        let canonical = canonicalize(
            strings(&["m :ARG0 person :name name :op1 \"Obama\""]),
            CanonOptions::default().ignore_entity_types(true),
        );
        assert_eq!(canonical, strings(&["m :ARG0 :name \"Obama\""]));
    }

    #[test]
    fn test_canonicalize_idempotent() {
        let once = canonicalize(
            strings(&[
                "w :ARG0 b",
                "w :ARG1 g :ARG0 b",
                "w :ARG1 g",
                "w :ARG2 p :name name :op1 \"A\"",
            ]),
            CanonOptions::default(),
        );
        assert_eq!(canonicalize(once.clone(), CanonOptions::default()), once);
    }
}
