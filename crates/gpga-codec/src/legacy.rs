//! Bracketed printer for graphs built from metadata records
//!
//! Works breadth-first from the root: each node is first written as a
//! `[[id]]` placeholder, and a placeholder is later replaced by the full
//! `(var / concept ...)` form the first time and by the bare variable after.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use gpga_core::{Error, Graph};
use regex::Regex;

use crate::error::CodecResult;
use crate::metadata;

static OP_ROLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:op[0-9]+").expect("valid role pattern"));

/// Concepts printed bare when they have no children
const RESERVED_MARKERS: [&str; 4] = ["imperative", "expressive", "interrogative", "AD"];

const ESCAPED_CHARS: [char; 4] = [':', '/', '(', ')'];

const EMPTY_GRAPH: &str = "(a / amr-empty)";

/// Variable used for edge targets with no node record
const MISSING_VARIABLE: &str = "r91";

/// Print the metadata preamble followed by the bracketed graph.
///
/// The output is not guaranteed to decode as PENMAN again: every edge target
/// without a node record is written as `r91`, and labels containing spaces
/// are printed unquoted.
pub fn print(graph: &Graph) -> CodecResult<String> {
    let preamble = if graph.root().is_some() {
        metadata::encode(graph)?
    } else {
        format!("# ::tok {}\n", graph.tokens().join(" "))
    };
    if graph.is_empty() {
        return Ok(format!("{}{}\n\n", preamble, EMPTY_GRAPH));
    }
    Ok(format!("{}{}\n\n", preamble, brackets(graph)?))
}

/// The bracketed graph only
pub fn brackets(graph: &Graph) -> CodecResult<String> {
    if graph.is_empty() {
        return Ok(EMPTY_GRAPH.to_string());
    }
    let root = graph
        .root()
        .ok_or_else(|| Error::IncompleteGraph("graph has no root".into()))?;

    let labels = quoted_labels(graph);
    let variables = variable_names(graph, &labels);

    let mut text = placeholder(root);
    let mut frontier: Vec<&str> = vec![root];
    let mut completed: HashSet<&str> = HashSet::new();
    let mut depth = 1;

    while text.contains("[[") && !frontier.is_empty() {
        let tab = " ".repeat(6 * depth);
        let mut next: Vec<&str> = Vec::new();

        for id in std::mem::take(&mut frontier) {
            let marker = placeholder(id);
            let variable = variables.get(id).map_or(MISSING_VARIABLE, String::as_str);

            if completed.insert(id) {
                let concept = labels
                    .get(id)
                    .map(String::as_str)
                    .filter(|label| !label.is_empty())
                    .unwrap_or(gpga_core::limits::MISSING_LABEL);

                let mut links: Vec<_> = graph.children(id).iter().collect();
                links.sort_by(|a, b| a.label.cmp(&b.label));

                let starts_alphabetic = concept.chars().next().is_some_and(char::is_alphabetic);
                if (starts_alphabetic && !RESERVED_MARKERS.contains(&concept)) || !links.is_empty()
                {
                    let mut expanded = format!("({} / {}", variable, concept);
                    for link in &links {
                        expanded.push_str(&format!("\n{}{} {}", tab, link.label, placeholder(&link.node)));
                    }
                    expanded.push(')');
                    text = text.replacen(&marker, &expanded, 1);
                } else {
                    text = text.replace(&marker, concept);
                }

                for link in links {
                    if !next.contains(&link.node.as_str()) {
                        next.push(link.node.as_str());
                    }
                }
            }
            text = text.replace(&marker, variable);
        }

        frontier = next;
        depth += 1;
    }

    if text.contains("[[") {
        return Err(Error::IncompleteGraph("unresolved node placeholders".into()).into());
    }

    if text.starts_with('"') || text.starts_with('-') || text.starts_with(|c: char| c.is_ascii_digit())
    {
        text = format!("(x / {})", text);
    }
    if !text.starts_with('(') {
        text = format!("({})", text);
    }
    Ok(text)
}

fn placeholder(id: &str) -> String {
    format!("[[{}]]", id)
}

/// Labels with quotes added to name parts and to leaves holding bracket syntax
fn quoted_labels(graph: &Graph) -> HashMap<&str, String> {
    let mut labels: HashMap<&str, String> = graph
        .nodes()
        .iter()
        .map(|node| (node.id.as_str(), node.label.clone()))
        .collect();

    let sources: HashSet<&str> = graph.edges().iter().map(|e| e.source.as_str()).collect();
    for edge in graph.edges() {
        if sources.contains(edge.target.as_str()) {
            continue;
        }
        let Some(label) = labels.get_mut(edge.target.as_str()) else {
            continue;
        };
        let role = edge.label.split('-').next().unwrap_or_default();
        let name_part = graph.label(&edge.source) == gpga_core::limits::NAME_CONCEPT
            && OP_ROLE.is_match(role);
        if (name_part || label.contains(ESCAPED_CHARS)) && !label.contains('"') {
            *label = format!("\"{}\"", label);
        }
    }
    labels
}

/// Short variable names from the first letter of each concept
fn variable_names<'g>(graph: &'g Graph, labels: &HashMap<&str, String>) -> HashMap<&'g str, String> {
    let mut names: HashMap<&str, String> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();

    for node in graph.nodes() {
        let first = labels
            .get(node.id.as_str())
            .and_then(|label| label.chars().next())
            .unwrap_or('x');
        let name = if first.is_alphabetic() && first.is_lowercase() {
            let mut name = first.to_string();
            let mut suffix = 2;
            while used.contains(&name) {
                name = format!("{}{}", first, suffix);
                suffix += 1;
            }
            name
        } else {
            (0..)
                .map(|suffix| format!("x{}", suffix))
                .find(|name| !used.contains(name))
                .unwrap_or_default()
        };
        used.insert(name.clone());
        names.insert(node.id.as_str(), name);
    }
    names
}
