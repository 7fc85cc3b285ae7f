//! Corpus files: blank-line separated blocks, and the path listing output

use std::fs;
use std::io::Write;
use std::path::Path;

use gpga_core::Graph;

use crate::document::{Document, InputFormat};
use crate::error::{CodecError, CodecResult, SentenceError};

/// How blocks of a corpus are decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub format: InputFormat,
    pub tokenize: bool,
}

impl ReadOptions {
    pub fn new(format: InputFormat) -> Self {
        Self {
            format,
            tokenize: false,
        }
    }

    pub fn tokenize(mut self, tokenize: bool) -> Self {
        self.tokenize = tokenize;
        self
    }
}

/// One decoded block, or the reason it could not be decoded
pub type SentenceResult = Result<Document, SentenceError>;

/// Split text into blocks of consecutive non-blank lines
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }
    blocks
}

/// Decode every block; failures are kept in place with their index
pub fn read_corpus(text: &str, options: ReadOptions) -> Vec<SentenceResult> {
    split_blocks(text)
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let document = Document::decode(block, options.format, options.tokenize)
                .map_err(|source| SentenceError { index, source })?;
            for (edge, count) in document.graph.duplicate_edges() {
                tracing::warn!(
                    "Sentence {} repeats edge {} {} {} {} times: {}",
                    index,
                    edge.source,
                    edge.label,
                    edge.target,
                    count,
                    document.graph.tokens().join(" ")
                );
            }
            Ok(document)
        })
        .collect()
}

pub fn read_corpus_file(path: &Path, options: ReadOptions) -> CodecResult<Vec<SentenceResult>> {
    let text = fs::read_to_string(path)?;
    let sentences = read_corpus(&text, options);
    tracing::debug!("Read {} blocks from {}", sentences.len(), path.display());
    Ok(sentences)
}

/// Write one block per sentence: its surface tokens, then one path per line
pub fn write_paths<'a, W, I>(writer: &mut W, sentences: I) -> CodecResult<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a Graph, &'a [String])>,
{
    for (graph, paths) in sentences {
        let tokens: Vec<&str> = graph.surface_tokens().collect();
        writeln!(writer, "# ::tok {}", tokens.join(" "))?;
        for path in paths {
            writeln!(writer, "{}", path)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

pub fn write_paths_file<'a, I>(path: &Path, sentences: I) -> CodecResult<()>
where
    I: IntoIterator<Item = (&'a Graph, &'a [String])>,
{
    let mut file = std::io::BufWriter::new(fs::File::create(path)?);
    write_paths(&mut file, sentences)?;
    file.flush().map_err(CodecError::from)
}
