//! JAMR-style output: the encoded graph with `::node` spans rewritten from
//! the graph's alignments

use gpga_core::{Error, Graph};

use crate::error::CodecResult;

/// Rewrite the span column of every `# ::node` line in `encoded`.
///
/// At least one line must receive a span from the graph.
pub fn patch_node_spans(encoded: &str, graph: &Graph) -> CodecResult<String> {
    if !graph.has_alignments() {
        return Err(Error::InvariantViolation("graph has no alignments to write".into()).into());
    }

    let mut lines = Vec::new();
    let mut patched = false;

    for line in encoded.split('\n') {
        if !line.starts_with("# ::node") {
            lines.push(line.to_string());
            continue;
        }
        let mut items: Vec<String> = line.split('\t').map(str::to_string).collect();
        let Some((start, end)) = items.get(1).and_then(|id| graph.node(id)).and_then(|n| n.span())
        else {
            tracing::debug!("Leaving unaligned node line as is: {}", line);
            lines.push(line.to_string());
            continue;
        };
        let span = format!("{}-{}", start, end);
        match items.len() {
            4 => items[3] = span,
            3 => items.push(span),
            _ => {
                return Err(Error::InvariantViolation(format!(
                    "node line with {} fields: {:?}",
                    items.len(),
                    line
                ))
                .into())
            }
        }
        lines.push(items.join("\t"));
        patched = true;
    }

    if !patched {
        return Err(Error::InvariantViolation("no ::node line was patched".into()).into());
    }
    Ok(lines.join("\n") + "\n")
}
