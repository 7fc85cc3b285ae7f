//! Named-entity and question-focus detection

use crate::ancestry::AncestorSearch;
use crate::error::Result;
use crate::graph::Graph;
use crate::limits::{COUNT_CONCEPT, NAME_CONCEPT, NAME_ROLE, UNKNOWN_CONCEPT};
use serde::{Deserialize, Serialize};

/// Kind of question a graph encodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKind {
    /// Explicit `amr-unknown` focus (or nothing found)
    #[default]
    Select,
    /// Root carries `:mode imperative`
    Imperative,
    /// Root carries `:mode interrogative`
    Boolean,
}

/// Question focus of a graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownFocus {
    pub ids: Vec<String>,
    pub kind: UnknownKind,
}

/// Ids of entity nodes, i.e. sources of `:name` edges into a `name` node.
///
/// An entity is dropped when every upward path from it towards the other
/// entities ends inside one of them.
pub fn entity_ids(graph: &Graph) -> Result<Vec<String>> {
    let mut candidates: Vec<&str> = Vec::new();
    for edge in graph.edges() {
        if edge.label == NAME_ROLE
            && graph.label(&edge.target) == NAME_CONCEPT
            && !candidates.contains(&edge.source.as_str())
        {
            candidates.push(edge.source.as_str());
        }
    }

    let search = AncestorSearch::new(graph);
    let mut entities = Vec::new();
    for &entity in &candidates {
        let others: Vec<&str> = candidates
            .iter()
            .copied()
            .filter(|other| *other != entity)
            .collect();
        let ancestors = search.paths(entity, &others)?;
        let escapes = ancestors.iter().any(|path| {
            path.last()
                .is_some_and(|tip| !others.contains(&tip.as_str()))
        });
        if escapes {
            entities.push(entity.to_string());
        } else {
            tracing::debug!("Entity {} is nested in another entity", entity);
        }
    }
    Ok(entities)
}

/// Locate the question focus of a graph.
///
/// Explicit `amr-unknown` nodes win. Otherwise the root's `:mode` decides
/// the kind and, for imperatives, the root's `:ARG1` or `:rel` child is the
/// focus (looking through a counting predicate to its own argument).
pub fn unknown_focus(graph: &Graph) -> UnknownFocus {
    let explicit: Vec<String> = graph
        .ids_with_label(UNKNOWN_CONCEPT)
        .map(str::to_string)
        .collect();
    if !explicit.is_empty() {
        return UnknownFocus {
            ids: explicit,
            kind: UnknownKind::Select,
        };
    }

    let Some(root) = graph.root() else {
        return UnknownFocus::default();
    };

    let mut kind = UnknownKind::Select;
    let mut candidate: Option<&str> = None;
    for link in graph.children(root) {
        match link.label.as_str() {
            ":mode" => match graph.label(&link.node) {
                "imperative" => kind = UnknownKind::Imperative,
                "interrogative" => kind = UnknownKind::Boolean,
                _ => {}
            },
            ":ARG1" | ":rel" => {
                candidate = Some(link.node.as_str());
                if graph.label(&link.node) == COUNT_CONCEPT {
                    if let Some(counted) = graph
                        .children(&link.node)
                        .iter()
                        .find(|inner| inner.label == link.label)
                    {
                        candidate = Some(counted.node.as_str());
                    }
                }
            }
            _ => {}
        }
    }

    let ids = match (kind, candidate) {
        (UnknownKind::Imperative, Some(id)) => vec![id.to_string()],
        _ => Vec::new(),
    };
    UnknownFocus { ids, kind }
}
