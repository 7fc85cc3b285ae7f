//! Convert command: re-serialize a corpus

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use gpga_codec::Document;

use super::InputArgs;
use crate::config::Config;
use crate::output::emit;

/// Target serialization
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConvertTarget {
    /// `::node`/`::edge`/`::root` records
    Metadata,
    /// PENMAN as read, or the legacy printout for metadata input
    Penman,
    /// PENMAN with `::node` spans rewritten from alignments
    Jamr,
    /// Metadata preamble and breadth-first bracketed graph
    Legacy,
}

#[derive(Args)]
pub struct ConvertArgs {
    /// AMR corpus
    #[arg(long)]
    pub in_amr: PathBuf,

    /// Target format
    #[arg(long, value_enum)]
    pub to: ConvertTarget,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub input: InputArgs,
}

fn convert(document: &Document, target: ConvertTarget) -> gpga_codec::CodecResult<String> {
    match target {
        ConvertTarget::Metadata => document.to_metadata(),
        ConvertTarget::Penman => document.encode(),
        ConvertTarget::Jamr => document.to_jamr(),
        ConvertTarget::Legacy => document.to_legacy(),
    }
}

pub fn run(args: &ConvertArgs, config: &Config) -> anyhow::Result<()> {
    let sentences = args.input.read(&args.in_amr, config)?;

    let mut output = String::new();
    let mut converted = 0;
    for (index, sentence) in sentences.iter().enumerate() {
        let document = match sentence {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("Skipping {}", e);
                continue;
            }
        };
        match convert(document, args.to) {
            Ok(block) => {
                output.push_str(block.trim_end());
                output.push_str("\n\n");
                converted += 1;
            }
            Err(e) => tracing::warn!("Skipping sentence {}: {}", index, e),
        }
    }
    tracing::info!("Converted {} of {} sentences", converted, sentences.len());

    emit(&output, args.output.as_deref())
}
