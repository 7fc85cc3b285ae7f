//! Graph construction from a stream of discrete actions
//!
//! This is the contract offered to transition-based producers: they decide
//! *which* actions to take, the builder only turns them into a graph.

use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, Node};
use std::fmt;
use std::str::FromStr;

/// One graph construction step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphAction {
    Node {
        id: String,
        label: String,
        span: Option<(usize, usize)>,
    },
    Edge {
        source: String,
        label: String,
        target: String,
    },
    Root(String),
    Close,
}

impl fmt::Display for GraphAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node { id, label, span } => {
                write!(f, "node\t{}\t{}", id, label)?;
                if let Some((start, end)) = span {
                    write!(f, "\t{}-{}", start, end)?;
                }
                Ok(())
            }
            Self::Edge {
                source,
                label,
                target,
            } => write!(f, "edge\t{}\t{}\t{}", source, label, target),
            Self::Root(id) => write!(f, "root\t{}", id),
            Self::Close => write!(f, "close"),
        }
    }
}

impl FromStr for GraphAction {
    type Err = Error;

    /// Parse the tab-separated form produced by `Display`
    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.trim_end_matches(['\r', '\n']).split('\t').collect();
        let invalid = || Error::InvariantViolation(format!("Unparseable action: {:?}", s));
        match fields.as_slice() {
            ["node", id, label] => Ok(Self::Node {
                id: id.to_string(),
                label: label.to_string(),
                span: None,
            }),
            ["node", id, label, span] => {
                let (start, end) = span.split_once('-').ok_or_else(invalid)?;
                let start = start.parse().map_err(|_| invalid())?;
                let end = end.parse().map_err(|_| invalid())?;
                Ok(Self::Node {
                    id: id.to_string(),
                    label: label.to_string(),
                    span: Some((start, end)),
                })
            }
            ["edge", source, label, target] => Ok(Self::Edge {
                source: source.to_string(),
                label: label.to_string(),
                target: target.to_string(),
            }),
            ["root", id] => Ok(Self::Root(id.to_string())),
            ["close"] => Ok(Self::Close),
            _ => Err(invalid()),
        }
    }
}

/// Accumulates actions into a graph
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
    closed: bool,
}

impl GraphBuilder {
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            graph: Graph::new(tokens),
            closed: false,
        }
    }

    /// Graph built so far
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn apply(&mut self, action: GraphAction) -> Result<()> {
        if self.closed {
            return Err(Error::InvariantViolation(format!(
                "Action after close: {}",
                action
            )));
        }
        tracing::trace!("Applying action {}", action);

        match action {
            GraphAction::Node { id, label, span } => {
                if self.graph.contains(&id) {
                    return Err(Error::InvariantViolation(format!(
                        "Node {} created twice",
                        id
                    )));
                }
                let mut node = Node::new(id, label);
                if let Some((start, end)) = span {
                    if end > self.graph.tokens().len() {
                        return Err(Error::InvariantViolation(format!(
                            "Span {}-{} of node {} past the last of {} tokens",
                            start,
                            end,
                            node.id,
                            self.graph.tokens().len()
                        )));
                    }
                    node = node.with_alignment(start..end);
                }
                self.graph.insert_node(node);
            }
            GraphAction::Edge {
                source,
                label,
                target,
            } => self.graph.push_edge(Edge::new(source, label, target)),
            GraphAction::Root(id) => self.graph.set_root(Some(id)),
            GraphAction::Close => self.closed = true,
        }
        Ok(())
    }

    pub fn apply_actions(&mut self, actions: impl IntoIterator<Item = GraphAction>) -> Result<()> {
        actions.into_iter().try_for_each(|action| self.apply(action))
    }

    /// Finish construction. The root must name an existing node.
    pub fn finish(self) -> Result<Graph> {
        let Some(root) = self.graph.root() else {
            return Err(Error::IncompleteGraph("no root action was applied".into()));
        };
        if !self.graph.contains(root) {
            return Err(Error::IncompleteGraph(format!("root {} is not a node", root)));
        }
        Ok(self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions() -> Vec<GraphAction> {
        [
            "node\tw\twant-01\t2-3",
            "node\tb\tboy\t1-2",
            "edge\tw\t:ARG0\tb",
            "edge\tw\t:ARG0\tb",
            "root\tw",
            "close",
        ]
        .iter()
        .map(|line| line.parse().unwrap())
        .collect()
    }

    #[test]
    fn test_build_from_actions() {
        let mut builder = GraphBuilder::new(vec!["The".into(), "boy".into(), "wants".into()]);
        builder.apply_actions(actions()).unwrap();
        assert!(builder.is_closed());

        let graph = builder.finish().unwrap();
        assert_eq!(graph.root(), Some("w"));
        assert_eq!(graph.alignment("w"), Some(&[2][..]));
        assert_eq!(graph.duplicate_edges()[0].1, 2);
    }

    #[test]
    fn test_action_text_round_trip() {
        for action in actions() {
            let text = action.to_string();
            assert_eq!(text.parse::<GraphAction>().unwrap(), action);
        }
    }

    #[test]
    fn test_action_after_close_rejected() {
        let mut builder = GraphBuilder::new(vec![]);
        builder.apply(GraphAction::Close).unwrap();
        let err = builder.apply(GraphAction::Root("a".into())).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }

    #[test]
    fn test_span_past_last_token_rejected() {
        let mut builder = GraphBuilder::new(vec!["dog".into()]);
        let action: GraphAction = "node\td\tdog\t0-4000000000".parse().unwrap();
        let err = builder.apply(action).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
        assert!(builder.graph().is_empty());
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut builder = GraphBuilder::new(vec![]);
        let node = GraphAction::Node {
            id: "a".into(),
            label: "dog".into(),
            span: None,
        };
        builder.apply(node.clone()).unwrap();
        assert!(builder.apply(node).is_err());
    }

    #[test]
    fn test_finish_requires_known_root() {
        let builder = GraphBuilder::new(vec![]);
        assert!(matches!(builder.finish(), Err(Error::IncompleteGraph(_))));

        let mut builder = GraphBuilder::new(vec![]);
        builder.apply(GraphAction::Root("ghost".into())).unwrap();
        assert!(matches!(builder.finish(), Err(Error::IncompleteGraph(_))));
    }

    #[test]
    fn test_garbage_action_rejected() {
        assert!("shift".parse::<GraphAction>().is_err());
        assert!("node\ta\tdog\tx-y".parse::<GraphAction>().is_err());
    }
}
