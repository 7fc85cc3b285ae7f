//! GPGA Core - AMR graph model and path algorithms
//!
//! This crate provides the sentence graph, its construction API, and the
//! traversal algorithms the GPGA metric is built on: root-to-leaf path
//! extraction, ancestor path search and entity/question-focus detection.

pub mod ancestry;
pub mod builder;
pub mod entity;
pub mod error;
pub mod graph;
pub mod limits;
pub mod paths;
pub mod tokenizer;

pub use ancestry::AncestorSearch;
pub use builder::{GraphAction, GraphBuilder};
pub use entity::{entity_ids, unknown_focus, UnknownFocus, UnknownKind};
pub use error::{Error, Result};
pub use graph::{Edge, Graph, Link, Node, Reentrancy};
pub use paths::{NodePath, PathExtractor, PathQuery};
pub use tokenizer::{ProtectedTokenizer, Token, Tokenizer, WhitespaceTokenizer};
