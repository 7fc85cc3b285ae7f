//! GPGA Codec - reading and writing AMR corpora
//!
//! Supports PENMAN blocks, line-oriented metadata records, the legacy
//! breadth-first bracketed printer and JAMR-style node span patching.

pub mod corpus;
pub mod document;
pub mod error;
pub mod jamr;
pub mod legacy;
pub mod metadata;
pub mod penman;

pub use corpus::{
    read_corpus, read_corpus_file, split_blocks, write_paths, write_paths_file, ReadOptions,
    SentenceResult,
};
pub use document::{Document, InputFormat, Source};
pub use error::{CodecError, CodecResult, SentenceError};
pub use metadata::Metadata;
pub use penman::PenmanGraph;
