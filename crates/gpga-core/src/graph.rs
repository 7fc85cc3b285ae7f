//! AMR graph container with cached parent/child indices

use crate::limits::{MISSING_LABEL, ROOT_TOKEN};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A concept or constant in the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Node id (variable name or synthesized attribute id)
    pub id: String,

    /// Concept or constant label
    pub label: String,

    /// Sorted token indices this node is aligned to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Vec<usize>>,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            alignment: None,
        }
    }

    pub fn with_alignment(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.alignment = normalize_alignment(indices);
        self
    }

    /// Half-open token span covered by the alignment
    pub fn span(&self) -> Option<(usize, usize)> {
        let indices = self.alignment.as_ref()?;
        Some((*indices.first()?, *indices.last()? + 1))
    }
}

/// A labeled, directed relation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub source: String,
    pub label: String,
    pub target: String,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        label: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            label: label.into(),
            target: target.into(),
        }
    }
}

/// One entry of an adjacency list: the node on the other end and the relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub node: String,
    pub label: String,
}

/// A node with more than one parent and the parent that introduces it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reentrancy {
    pub node: String,
    pub primary_parent: String,
}

#[derive(Debug, Clone, Default)]
struct Adjacency {
    by_parent: HashMap<String, Vec<Link>>,
    by_child: HashMap<String, Vec<Link>>,
}

impl Adjacency {
    fn build(edges: &[Edge]) -> Self {
        let mut adjacency = Self::default();
        for edge in edges {
            adjacency
                .by_parent
                .entry(edge.source.clone())
                .or_default()
                .push(Link {
                    node: edge.target.clone(),
                    label: edge.label.clone(),
                });
            adjacency
                .by_child
                .entry(edge.target.clone())
                .or_default()
                .push(Link {
                    node: edge.source.clone(),
                    label: edge.label.clone(),
                });
        }
        tracing::trace!("Rebuilt adjacency cache for {} edges", edges.len());
        adjacency
    }
}

/// Sentence-level AMR graph
///
/// Nodes live in an insertion-ordered arena indexed by id. Parent and child
/// lists are derived from the edge sequence on first use and dropped by every
/// mutation of the edges.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Graph {
    tokens: Vec<String>,
    nodes: Vec<Node>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    root: Option<String>,
    #[serde(skip)]
    adjacency: OnceLock<Adjacency>,
}

impl Graph {
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            ..Default::default()
        }
    }

    pub fn with_node(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.insert_node(Node::new(id, label));
        self
    }

    pub fn with_edge(
        mut self,
        source: impl Into<String>,
        label: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.push_edge(Edge::new(source, label, target));
        self
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_alignment(mut self, id: &str, indices: impl IntoIterator<Item = usize>) -> Self {
        self.set_alignment(id, indices);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation (construction time only)
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a node, replacing any node with the same id. Returns the old node.
    pub fn insert_node(&mut self, node: Node) -> Option<Node> {
        match self.index.get(&node.id) {
            Some(&position) => Some(std::mem::replace(&mut self.nodes[position], node)),
            None => {
                self.index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
                None
            }
        }
    }

    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
        self.adjacency.take();
    }

    pub fn set_root(&mut self, root: Option<String>) {
        self.root = root;
    }

    /// Set the alignment of an existing node. Returns false for unknown ids.
    pub fn set_alignment(&mut self, id: &str, indices: impl IntoIterator<Item = usize>) -> bool {
        match self.index.get(id) {
            Some(&position) => {
                self.nodes[position].alignment = normalize_alignment(indices);
                true
            }
            None => false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────────────────────

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Tokens without the parser's `<ROOT>` pseudo-token
    pub fn surface_tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .map(String::as_str)
            .filter(|token| *token != ROOT_TOKEN)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A graph is complete once its root is one of its nodes
    pub fn is_complete(&self) -> bool {
        self.root().is_some_and(|root| self.contains(root))
    }

    /// Node label, or `None` for ids missing from the node map
    pub fn label(&self, id: &str) -> &str {
        self.node(id).map_or(MISSING_LABEL, |node| node.label.as_str())
    }

    pub fn alignment(&self, id: &str) -> Option<&[usize]> {
        self.node(id).and_then(|node| node.alignment.as_deref())
    }

    pub fn has_alignments(&self) -> bool {
        self.nodes.iter().any(|node| node.alignment.is_some())
    }

    /// Ids of all nodes carrying exactly this label
    pub fn ids_with_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.nodes
            .iter()
            .filter(move |node| node.label == label)
            .map(|node| node.id.as_str())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Adjacency
    // ─────────────────────────────────────────────────────────────────────────

    fn adjacency(&self) -> &Adjacency {
        self.adjacency.get_or_init(|| Adjacency::build(&self.edges))
    }

    /// Incoming relations of a node, in edge order
    pub fn parents(&self, id: &str) -> &[Link] {
        self.adjacency()
            .by_child
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Outgoing relations of a node, in edge order
    pub fn children(&self, id: &str) -> &[Link] {
        self.adjacency()
            .by_parent
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn parent_ids(&self, id: &str) -> Vec<&str> {
        self.parents(id).iter().map(|link| link.node.as_str()).collect()
    }

    pub fn child_ids(&self, id: &str) -> Vec<&str> {
        self.children(id).iter().map(|link| link.node.as_str()).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Diagnostics
    // ─────────────────────────────────────────────────────────────────────────

    /// Edges that appear more than once, with their counts, in first-seen order
    pub fn duplicate_edges(&self) -> Vec<(Edge, usize)> {
        let mut counts: HashMap<&Edge, usize> = HashMap::new();
        let mut order: Vec<&Edge> = Vec::new();
        for edge in &self.edges {
            let count = counts.entry(edge).or_insert(0);
            if *count == 0 {
                order.push(edge);
            }
            *count += 1;
        }
        order
            .into_iter()
            .filter_map(|edge| {
                let count = counts[edge];
                (count > 1).then(|| (edge.clone(), count))
            })
            .collect()
    }

    /// Nodes with more than one distinct parent
    ///
    /// The primary parent is the one aligned leftmost in the sentence;
    /// unaligned parents sort last and ties keep edge order.
    pub fn reentrancies(&self) -> Vec<Reentrancy> {
        let mut result = Vec::new();
        for node in &self.nodes {
            let mut parents: Vec<&str> = Vec::new();
            for parent in self.parent_ids(&node.id) {
                if !parents.contains(&parent) {
                    parents.push(parent);
                }
            }
            if parents.len() < 2 {
                continue;
            }
            parents.sort_by_key(|parent| self.first_alignment(parent).unwrap_or(usize::MAX));
            result.push(Reentrancy {
                node: node.id.clone(),
                primary_parent: parents[0].to_string(),
            });
        }
        result
    }

    /// Leftmost token index aligned to a node
    pub fn first_alignment(&self, id: &str) -> Option<usize> {
        self.alignment(id).and_then(|indices| indices.first().copied())
    }
}

fn normalize_alignment(indices: impl IntoIterator<Item = usize>) -> Option<Vec<usize>> {
    let mut indices: Vec<usize> = indices.into_iter().collect();
    if indices.is_empty() {
        return None;
    }
    indices.sort_unstable();
    indices.dedup();
    Some(indices)
}
