//! Line-oriented metadata records (`# ::tok`, `# ::node`, `# ::edge`, `# ::root`)

use std::sync::LazyLock;

use gpga_core::{Edge, Error, Graph, Node, ProtectedTokenizer, Tokenizer, WhitespaceTokenizer};
use regex::Regex;

use crate::error::CodecResult;

static FIELD_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"::[A-Za-z]+").expect("valid field pattern"));

static SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?[0-9]+)-(-?[0-9]+)").expect("valid span pattern"));

/// Field values found in the comment lines of a block, in order of appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    fields: Vec<(String, String)>,
}

impl Metadata {
    /// Collect `::field value` pairs from `#` lines.
    ///
    /// A value runs until the next marker, across lines; text before the
    /// first marker is ignored.
    pub fn parse<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut fields = Vec::new();
        let mut key: Option<String> = None;
        for line in lines {
            let Some(comment) = line.trim_start().strip_prefix('#') else {
                continue;
            };
            let comment = comment.trim();
            let mut start = 0;
            for marker in FIELD_KEY.find_iter(comment) {
                let value = &comment[start..marker.start()];
                if let (Some(key), false) = (&key, value.is_empty()) {
                    fields.push((key.clone(), value.to_string()));
                }
                key = Some(marker.as_str()[2..].to_string());
                start = marker.end();
            }
            let value = &comment[start..];
            if let (Some(key), false) = (&key, value.is_empty()) {
                fields.push((key.clone(), value.to_string()));
            }
        }
        Self { fields }
    }

    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn first<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        self.values(key).next()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.first(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sentence tokens from `::tok`, or from `::snt` when re-tokenizing
    pub fn tokens(&self, tokenize: bool) -> Result<Vec<String>, Error> {
        if tokenize {
            let sentence: Vec<&str> = self.values("snt").map(str::trim).collect();
            if sentence.is_empty() {
                return Err(Error::MissingField("snt".into()));
            }
            return Ok(ProtectedTokenizer.words(&sentence.join(" ")));
        }
        let mut values = self.values("tok");
        let tokens = values.next().ok_or_else(|| Error::MissingField("tok".into()))?;
        if values.next().is_some() {
            return Err(Error::malformed("tok", "more than one token line"));
        }
        Ok(WhitespaceTokenizer.words(tokens))
    }
}

/// Parse a half-open `start-end` span into token indices.
///
/// The span must end within the sentence's `token_count` tokens.
pub fn parse_span(text: &str, token_count: usize) -> Result<Vec<usize>, Error> {
    let captures = SPAN
        .captures(text.trim())
        .ok_or_else(|| Error::malformed("node", format!("bad alignment {:?}", text)))?;
    let bound = |index: usize| -> Result<usize, Error> {
        captures[index]
            .parse::<usize>()
            .map_err(|_| Error::malformed("node", format!("negative alignment {:?}", text)))
    };
    let (start, end) = (bound(1)?, bound(2)?);
    if end > token_count {
        return Err(Error::malformed(
            "node",
            format!("alignment {:?} past the last of {} tokens", text, token_count),
        ));
    }
    Ok((start..end).collect())
}

/// Decode a block in metadata form into a graph
pub fn decode(block: &str, tokenize: bool) -> CodecResult<Graph> {
    let metadata = Metadata::parse(block.lines());
    decode_fields(&metadata, tokenize)
}

pub(crate) fn decode_fields(metadata: &Metadata, tokenize: bool) -> CodecResult<Graph> {
    let mut graph = Graph::new(metadata.tokens(tokenize)?);

    for value in metadata.values("node") {
        let items: Vec<&str> = value.split('\t').collect();
        let node = match items.as_slice() {
            [_, id, label] => Node::new(*id, *label),
            [_, id, label, span, ..] => {
                Node::new(*id, *label).with_alignment(parse_span(span, graph.tokens().len())?)
            }
            _ => return Err(Error::malformed("node", format!("{:?}", value)).into()),
        };
        graph.insert_node(node);
    }

    for value in metadata.values("edge") {
        let items: Vec<&str> = value.split('\t').collect();
        match items.as_slice() {
            [_, _, label, _, source, target, ..] => {
                graph.push_edge(Edge::new(*source, format!(":{}", label), *target))
            }
            _ => return Err(Error::malformed("edge", format!("{:?}", value)).into()),
        }
    }

    let mut roots = metadata.values("root");
    if let Some(value) = roots.next() {
        if roots.next().is_some() {
            return Err(Error::malformed("root", "more than one root record").into());
        }
        let id = value
            .split('\t')
            .nth(1)
            .ok_or_else(|| Error::malformed("root", format!("{:?}", value)))?;
        graph.set_root(Some(id.to_string()));
    }

    Ok(graph)
}

/// Encode a graph as metadata records
pub fn encode(graph: &Graph) -> CodecResult<String> {
    let root = graph
        .root()
        .ok_or_else(|| Error::IncompleteGraph("metadata needs a root".into()))?;

    let mut output = format!("# ::tok {}\n", graph.tokens().join(" "));
    for node in graph.nodes() {
        output.push_str(&format!("# ::node\t{}\t{}", node.id, node.label));
        if let Some((start, end)) = node.span() {
            output.push_str(&format!("\t{}-{}", start, end));
        }
        output.push('\n');
    }
    output.push_str(&format!("# ::root\t{}\t{}\n", root, graph.label(root)));
    for edge in graph.edges() {
        output.push_str(&format!(
            "# ::edge\t{}\t{}\t{}\t{}\t{}\t\n",
            graph.label(&edge.source),
            edge.label.replace(':', ""),
            graph.label(&edge.target),
            edge.source,
            edge.target
        ));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;

    const BLOCK: &str = "# ::tok The boy wants to go\n\
# ::node\tw\twant-01\t2-3\n\
# ::node\tb\tboy\t1-2\n\
# ::node\tg\tgo-01\t4-5\n\
# ::root\tw\twant-01\n\
# ::edge\twant-01\tARG0\tboy\tw\tb\t\n\
# ::edge\twant-01\tARG1\tgo-01\tw\tg\t\n\
# ::edge\tgo-01\tARG0\tboy\tg\tb\t\n";

    #[test]
    fn test_decode_block() {
        let graph = decode(BLOCK, false).unwrap();

        assert_eq!(graph.tokens(), &["The", "boy", "wants", "to", "go"]);
        assert_eq!(graph.root(), Some("w"));
        assert_eq!(graph.nodes().len(), 3);
        assert_eq!(graph.edges().len(), 3);
        assert_eq!(graph.edges()[0].label, ":ARG0");
        assert_eq!(graph.alignment("g"), Some(&[4][..]));
    }

    #[test]
    fn test_encode_matches_input() {
        let graph = decode(BLOCK, false).unwrap();
        assert_eq!(encode(&graph).unwrap(), BLOCK);
    }

    #[test]
    fn test_missing_tok_field() {
        let err = decode("# ::node\ta\tdog\n", false).unwrap_err();
        assert!(matches!(err, CodecError::Graph(Error::MissingField(f)) if f == "tok"));
    }

    #[test]
    fn test_duplicate_tok_field() {
        let err = decode("# ::tok a\n# ::tok b\n", false).unwrap_err();
        assert!(matches!(err, CodecError::Graph(Error::MalformedField { .. })));
    }

    #[test]
    fn test_tokenize_from_snt() {
        let graph = decode("# ::snt Who won?\n# ::tok ignored\n", true).unwrap();
        assert_eq!(graph.tokens(), &["Who", "won", "?"]);

        let err = decode("# ::tok a b\n", true).unwrap_err();
        assert!(matches!(err, CodecError::Graph(Error::MissingField(f)) if f == "snt"));
    }

    #[test]
    fn test_multiline_value_and_inline_fields() {
        let metadata = Metadata::parse(["# ::id 7 ::date today", "# more text"]);
        assert_eq!(metadata.first("id"), Some(" 7 "));
        assert_eq!(metadata.values("date").collect::<Vec<_>>(), vec![" today", "more text"]);
    }

    #[test]
    fn test_node_without_alignment_and_no_root() {
        let graph = decode("# ::tok a\n# ::node\tx\tdog\n", false).unwrap();
        assert_eq!(graph.alignment("x"), None);
        assert_eq!(graph.root(), None);
        assert!(matches!(
            encode(&graph),
            Err(CodecError::Graph(Error::IncompleteGraph(_)))
        ));
    }

    #[test]
    fn test_bad_span_rejected() {
        assert!(parse_span("x-y", 5).is_err());
        assert!(parse_span("-1-2", 5).is_err());
        assert_eq!(parse_span("3-5", 5).unwrap(), vec![3, 4]);
    }

    #[test]
    fn test_span_past_sentence_end_rejected() {
        assert!(matches!(
            parse_span("0-4000000000", 5),
            Err(Error::MalformedField { .. })
        ));
        let block = "# ::tok a dog
# ::node	x	dog	1-3
# ::root	x	dog
";
        assert!(matches!(
            decode(block, false),
            Err(CodecError::Graph(Error::MalformedField { .. }))
        ));
    }
}
