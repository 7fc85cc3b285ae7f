//! PENMAN bracketed notation
//!
//! A block is parsed into a [`Tree`] that keeps the text exactly as written
//! (including `~e.N` alignment markers) so it can be re-encoded, and is
//! interpreted into a [`Graph`] separately.

use std::collections::HashSet;

use gpga_core::limits::MISSING_LABEL;
use gpga_core::{Edge, Error, Graph, Node};

use crate::error::{CodecError, CodecResult};
use crate::metadata::{parse_span, Metadata};

/// A node in bracketed form: `(variable / concept :role target ...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub variable: String,
    pub concept: Option<String>,
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub role: String,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Node(Tree),
    /// A constant or a reference to a variable defined elsewhere
    Atom(String),
}

/// A parsed PENMAN block: its comment lines and the bracketed tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PenmanGraph {
    pub comments: Vec<String>,
    pub tree: Tree,
}

impl PenmanGraph {
    pub fn parse(text: &str) -> CodecResult<Self> {
        let mut comments = Vec::new();
        let mut body = String::new();
        for line in text.lines() {
            if line.trim_start().starts_with('#') {
                comments.push(line.to_string());
            } else {
                body.push_str(line);
                body.push('\n');
            }
        }

        let mut parser = Parser::new(lex(&body)?, body.len());
        if parser.peek().is_none() {
            return Err(CodecError::syntax(0, "no graph in block"));
        }
        let tree = parser.tree()?;
        if let Some((offset, lexeme)) = parser.next() {
            return Err(CodecError::syntax(
                offset,
                format!("unexpected {} after graph", lexeme),
            ));
        }
        Ok(Self { comments, tree })
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::parse(self.comments.iter().map(String::as_str))
    }

    /// Interpret the tree as a graph.
    ///
    /// Edges to nested nodes keep the direction they are written in; a
    /// reference written with an inverted `-of` role is stored in its
    /// normal direction. Constants become nodes with ids `"0"`, `"1"`, ...
    /// in reading order.
    pub fn to_graph(&self, tokenize: bool) -> CodecResult<Graph> {
        let metadata = self.metadata();
        let mut graph = Graph::new(metadata.tokens(tokenize)?);

        let mut variables = HashSet::new();
        collect_variables(&self.tree, &mut variables)?;

        let mut constants = Vec::new();
        interpret(&self.tree, &variables, &mut graph, &mut constants);

        for (index, constant) in constants.into_iter().enumerate() {
            let id = index.to_string();
            if variables.contains(id.as_str()) {
                return Err(Error::InvariantViolation(format!(
                    "constant id {} collides with a variable",
                    id
                ))
                .into());
            }
            let mut node = Node::new(id.clone(), constant.value);
            if let Some(alignment) = constant.alignment {
                node = node.with_alignment(alignment);
            }
            graph.insert_node(node);
            graph.push_edge(Edge::new(constant.source, constant.role, id));
        }
        graph.set_root(Some(self.tree.variable.clone()));

        // Spans from `::node` records fill in nodes without inline markers
        for value in metadata.values("node") {
            let items: Vec<&str> = value.split('\t').collect();
            if let [_, id, _, span, ..] = items.as_slice() {
                if graph.contains(id) && graph.alignment(id).is_none() {
                    if let Ok(indices) = parse_span(span, graph.tokens().len()) {
                        graph.set_alignment(id, indices);
                    }
                }
            }
        }

        Ok(graph)
    }

    /// Serialize with the comment lines first and indentation aligned to
    /// the opening of each parent
    pub fn encode(&self) -> String {
        let mut output = String::new();
        for comment in &self.comments {
            output.push_str(comment);
            output.push('\n');
        }
        write_tree(&self.tree, 0, &mut output);
        output
    }
}

struct Constant {
    source: String,
    role: String,
    value: String,
    alignment: Option<Vec<usize>>,
}

fn collect_variables<'t>(tree: &'t Tree, variables: &mut HashSet<&'t str>) -> CodecResult<()> {
    if !variables.insert(tree.variable.as_str()) {
        return Err(Error::InvariantViolation(format!(
            "variable {} defined twice",
            tree.variable
        ))
        .into());
    }
    for branch in &tree.branches {
        if let Target::Node(child) = &branch.target {
            collect_variables(child, variables)?;
        }
    }
    Ok(())
}

fn interpret(
    tree: &Tree,
    variables: &HashSet<&str>,
    graph: &mut Graph,
    constants: &mut Vec<Constant>,
) {
    let (concept, alignment) = match tree.concept.as_deref() {
        Some(concept) => split_alignment(concept),
        None => (MISSING_LABEL, None),
    };
    let mut node = Node::new(tree.variable.clone(), concept);
    if let Some(alignment) = alignment {
        node = node.with_alignment(alignment);
    }
    graph.insert_node(node);

    for branch in &tree.branches {
        let (role, _) = split_alignment(&branch.role);
        match &branch.target {
            Target::Node(child) => {
                graph.push_edge(Edge::new(tree.variable.clone(), role, child.variable.clone()));
                interpret(child, variables, graph, constants);
            }
            Target::Atom(atom) => {
                let (value, alignment) = split_alignment(atom);
                if variables.contains(value) {
                    let edge = match role.strip_suffix("-of") {
                        Some(normal) => Edge::new(value, normal, tree.variable.clone()),
                        None => Edge::new(tree.variable.clone(), role, value),
                    };
                    graph.push_edge(edge);
                } else {
                    constants.push(Constant {
                        source: tree.variable.clone(),
                        role: role.to_string(),
                        value: value.to_string(),
                        alignment,
                    });
                }
            }
        }
    }
}

fn write_tree(tree: &Tree, column: usize, output: &mut String) {
    output.push('(');
    output.push_str(&tree.variable);
    if let Some(concept) = &tree.concept {
        output.push_str(" / ");
        output.push_str(concept);
    }
    let indent = column + 1 + tree.variable.chars().count() + 1;
    for branch in &tree.branches {
        output.push('\n');
        output.push_str(&" ".repeat(indent));
        output.push_str(&branch.role);
        output.push(' ');
        match &branch.target {
            Target::Node(child) => {
                write_tree(child, indent + branch.role.chars().count() + 1, output)
            }
            Target::Atom(atom) => output.push_str(atom),
        }
    }
    output.push(')');
}

/// Split a trailing `~e.N[,M]` marker off a concept, role or constant
pub fn split_alignment(atom: &str) -> (&str, Option<Vec<usize>>) {
    let search_from = if atom.starts_with('"') {
        closing_quote(atom.as_bytes(), 0).map_or(atom.len(), |end| end + 1)
    } else {
        0
    };
    let Some(position) = atom[search_from..].find('~') else {
        return (atom, None);
    };
    let at = search_from + position;
    let marker = &atom[at + 1..];
    let digits = match marker.split_once('.') {
        Some((prefix, digits)) if prefix.chars().all(|c| c.is_ascii_alphabetic()) => digits,
        Some(_) => return (atom, None),
        None => marker,
    };
    match digits
        .split(',')
        .map(|index| index.parse::<usize>().ok())
        .collect::<Option<Vec<_>>>()
    {
        Some(indices) => (&atom[..at], Some(indices)),
        None => (atom, None),
    }
}

/// Index of the quote closing the string opened at `open`
fn closing_quote(bytes: &[u8], open: usize) -> Option<usize> {
    let mut position = open + 1;
    while position < bytes.len() {
        match bytes[position] {
            b'\\' => position += 2,
            b'"' => return Some(position),
            _ => position += 1,
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme<'a> {
    Open,
    Close,
    Slash,
    Role(&'a str),
    Symbol(&'a str),
}

impl std::fmt::Display for Lexeme<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lexeme::Open => write!(f, "'('"),
            Lexeme::Close => write!(f, "')'"),
            Lexeme::Slash => write!(f, "'/'"),
            Lexeme::Role(role) => write!(f, "role {}", role),
            Lexeme::Symbol(symbol) => write!(f, "symbol {}", symbol),
        }
    }
}

fn lex(text: &str) -> CodecResult<Vec<(usize, Lexeme<'_>)>> {
    let bytes = text.as_bytes();
    let mut lexemes = Vec::new();
    let mut position = 0;
    while position < bytes.len() {
        let lexeme = match bytes[position] {
            byte if byte.is_ascii_whitespace() => {
                position += 1;
                continue;
            }
            b'(' => Lexeme::Open,
            b')' => Lexeme::Close,
            b'/' => Lexeme::Slash,
            first => {
                let start = position;
                position = scan_symbol(bytes, start)?;
                let text = &text[start..position];
                lexemes.push((
                    start,
                    if first == b':' {
                        Lexeme::Role(text)
                    } else {
                        Lexeme::Symbol(text)
                    },
                ));
                continue;
            }
        };
        lexemes.push((position, lexeme));
        position += 1;
    }
    Ok(lexemes)
}

/// End of the symbol starting at `start`; quoted sections may hold delimiters
fn scan_symbol(bytes: &[u8], start: usize) -> CodecResult<usize> {
    let mut position = start;
    while position < bytes.len() {
        match bytes[position] {
            b'"' => {
                position = closing_quote(bytes, position)
                    .ok_or_else(|| CodecError::syntax(position, "unterminated string"))?
                    + 1;
            }
            b'(' | b')' | b'/' => break,
            byte if byte.is_ascii_whitespace() => break,
            _ => position += 1,
        }
    }
    Ok(position)
}

struct Parser<'a> {
    lexemes: Vec<(usize, Lexeme<'a>)>,
    position: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    fn new(lexemes: Vec<(usize, Lexeme<'a>)>, end: usize) -> Self {
        Self {
            lexemes,
            position: 0,
            end,
        }
    }

    fn peek(&self) -> Option<Lexeme<'a>> {
        self.lexemes.get(self.position).map(|(_, lexeme)| *lexeme)
    }

    fn next(&mut self) -> Option<(usize, Lexeme<'a>)> {
        let item = self.lexemes.get(self.position).copied();
        if item.is_some() {
            self.position += 1;
        }
        item
    }

    fn expected(&mut self, what: &str) -> CodecError {
        match self.next() {
            Some((offset, lexeme)) => {
                CodecError::syntax(offset, format!("expected {}, found {}", what, lexeme))
            }
            None => CodecError::syntax(self.end, format!("expected {}, found end of input", what)),
        }
    }

    fn symbol(&mut self, what: &str) -> CodecResult<&'a str> {
        match self.peek() {
            Some(Lexeme::Symbol(symbol)) => {
                self.position += 1;
                Ok(symbol)
            }
            _ => Err(self.expected(what)),
        }
    }

    fn tree(&mut self) -> CodecResult<Tree> {
        if self.peek() != Some(Lexeme::Open) {
            return Err(self.expected("'('"));
        }
        self.position += 1;

        let variable = self.symbol("variable")?.to_string();
        let concept = if self.peek() == Some(Lexeme::Slash) {
            self.position += 1;
            Some(self.symbol("concept")?.to_string())
        } else {
            None
        };

        let mut branches = Vec::new();
        loop {
            match self.peek() {
                Some(Lexeme::Close) => {
                    self.position += 1;
                    break;
                }
                Some(Lexeme::Role(role)) => {
                    self.position += 1;
                    let target = match self.peek() {
                        Some(Lexeme::Open) => Target::Node(self.tree()?),
                        Some(Lexeme::Symbol(atom)) => {
                            self.position += 1;
                            Target::Atom(atom.to_string())
                        }
                        _ => return Err(self.expected("role target")),
                    };
                    branches.push(Branch {
                        role: role.to_string(),
                        target,
                    });
                }
                _ => return Err(self.expected("role or ')'")),
            }
        }

        Ok(Tree {
            variable,
            concept,
            branches,
        })
    }
}

/// Decode a PENMAN block into its parsed form and graph
pub fn decode(text: &str, tokenize: bool) -> CodecResult<(PenmanGraph, Graph)> {
    let penman = PenmanGraph::parse(text)?;
    let graph = penman.to_graph(tokenize)?;
    Ok((penman, graph))
}
