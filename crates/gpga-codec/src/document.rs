//! A decoded sentence: the graph plus the form it was read from

use std::fmt;
use std::str::FromStr;

use gpga_core::Graph;
use serde::{Deserialize, Serialize};

use crate::error::CodecResult;
use crate::penman::PenmanGraph;
use crate::{jamr, legacy, metadata, penman};

/// Block format of an input corpus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Penman,
    Metadata,
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "penman" => Ok(Self::Penman),
            "metadata" => Ok(Self::Metadata),
            other => Err(format!("Unknown input format: {}", other)),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Penman => write!(f, "penman"),
            Self::Metadata => write!(f, "metadata"),
        }
    }
}

/// Where a document's graph came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Parsed PENMAN text, kept for faithful re-encoding
    Penman(PenmanGraph),
    /// Metadata records or programmatic construction
    Metadata,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub graph: Graph,
    pub source: Source,
}

impl Document {
    pub fn decode(text: &str, format: InputFormat, tokenize: bool) -> CodecResult<Self> {
        match format {
            InputFormat::Penman => Self::from_penman(text, tokenize),
            InputFormat::Metadata => Self::from_metadata(text, tokenize),
        }
    }

    pub fn from_penman(text: &str, tokenize: bool) -> CodecResult<Self> {
        let (penman, graph) = penman::decode(text, tokenize)?;
        Ok(Self {
            graph,
            source: Source::Penman(penman),
        })
    }

    pub fn from_metadata(text: &str, tokenize: bool) -> CodecResult<Self> {
        Ok(Self {
            graph: metadata::decode(text, tokenize)?,
            source: Source::Metadata,
        })
    }

    pub fn from_graph(graph: Graph) -> Self {
        Self {
            graph,
            source: Source::Metadata,
        }
    }

    /// PENMAN text when the document was read from PENMAN, the legacy
    /// bracketed form otherwise
    pub fn encode(&self) -> CodecResult<String> {
        match &self.source {
            Source::Penman(penman) => Ok(penman.encode()),
            Source::Metadata => legacy::print(&self.graph),
        }
    }

    pub fn to_metadata(&self) -> CodecResult<String> {
        metadata::encode(&self.graph)
    }

    pub fn to_legacy(&self) -> CodecResult<String> {
        legacy::print(&self.graph)
    }

    pub fn to_jamr(&self) -> CodecResult<String> {
        jamr::patch_node_spans(&self.encode()?, &self.graph)
    }

    /// Human-readable form: tokens and PENMAN, or the legacy printout
    pub fn render(&self) -> CodecResult<String> {
        match &self.source {
            Source::Penman(penman) => Ok(format!(
                "{}\n\n{}",
                self.graph.tokens().join(" "),
                penman.encode()
            )),
            Source::Metadata => legacy::print(&self.graph),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;

    const PENMAN: &str = "# ::tok The boy\n# ::node\tb\tboy\n(b / boy~e.1)";

    #[test]
    fn test_penman_document() {
        let document = Document::decode(PENMAN, InputFormat::Penman, false).unwrap();

        assert!(matches!(document.source, Source::Penman(_)));
        assert_eq!(document.encode().unwrap(), PENMAN);
        assert_eq!(document.render().unwrap(), "The boy\n\n".to_string() + PENMAN);
        assert_eq!(
            document.to_jamr().unwrap(),
            "# ::tok The boy\n# ::node\tb\tboy\t1-2\n(b / boy~e.1)\n"
        );
    }

    #[test]
    fn test_jamr_needs_alignments() {
        let document =
            Document::decode("# ::tok The boy\n# ::node\tb\tboy\n(b / boy)", InputFormat::Penman, false)
                .unwrap();
        assert!(matches!(
            document.to_jamr(),
            Err(CodecError::Graph(gpga_core::Error::InvariantViolation(_)))
        ));
    }

    #[test]
    fn test_metadata_document_uses_legacy_printer() {
        let block = "# ::tok hi\n# ::node\tx\thello\t0-1\n# ::root\tx\thello\n";
        let document = Document::decode(block, InputFormat::Metadata, false).unwrap();

        assert_eq!(document.encode().unwrap(), document.to_legacy().unwrap());
        assert!(document.render().unwrap().ends_with("(h / hello)\n\n"));
        assert_eq!(document.to_metadata().unwrap(), block);
    }

    #[test]
    fn test_input_format_from_str() {
        assert_eq!("PENMAN".parse::<InputFormat>(), Ok(InputFormat::Penman));
        assert_eq!("metadata".parse::<InputFormat>(), Ok(InputFormat::Metadata));
        assert!("jamr".parse::<InputFormat>().is_err());
    }
}
