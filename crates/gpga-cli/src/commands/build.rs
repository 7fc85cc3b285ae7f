//! Build command: replay construction actions into graphs

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use gpga_codec::{metadata, split_blocks};
use gpga_core::{GraphAction, GraphBuilder};

use crate::output::emit;
use crate::Cli;

#[derive(Args)]
pub struct BuildArgs {
    /// One whitespace-tokenized sentence per line
    #[arg(long)]
    pub tokens: PathBuf,

    /// One action per line, a blank line after each sentence
    #[arg(long)]
    pub actions: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn build_sentence(tokens: &str, actions: &str) -> anyhow::Result<gpga_core::Graph> {
    let mut builder = GraphBuilder::new(tokens.split_whitespace().map(String::from).collect());
    for line in actions.lines() {
        let action: GraphAction = line.parse()?;
        builder.apply(action)?;
    }
    Ok(builder.finish()?)
}

pub fn run(args: &BuildArgs, cli: &Cli) -> anyhow::Result<()> {
    let tokens = std::fs::read_to_string(&args.tokens)
        .with_context(|| format!("Failed to read {}", args.tokens.display()))?;
    let actions = std::fs::read_to_string(&args.actions)
        .with_context(|| format!("Failed to read {}", args.actions.display()))?;

    let sentences: Vec<&str> = tokens.lines().filter(|l| !l.trim().is_empty()).collect();
    let blocks = split_blocks(&actions);
    if sentences.len() != blocks.len() {
        anyhow::bail!(
            "{} sentences but {} action blocks",
            sentences.len(),
            blocks.len()
        );
    }

    let mut output = String::new();
    let mut failed = 0;
    for (index, (sentence, block)) in sentences.iter().zip(&blocks).enumerate() {
        let graph = match build_sentence(sentence, block) {
            Ok(graph) => graph,
            Err(e) => {
                tracing::warn!("Skipping sentence {}: {:#}", index, e);
                failed += 1;
                continue;
            }
        };
        for (edge, count) in graph.duplicate_edges() {
            tracing::warn!(
                "Sentence {} repeats edge {} {} {} {} times: {}",
                index,
                edge.source,
                edge.label,
                edge.target,
                count,
                sentence
            );
        }
        output.push_str(&metadata::encode(&graph)?);
        output.push('\n');
    }

    if failed > 0 && !cli.quiet {
        eprintln!("{} of {} sentences could not be built", failed, sentences.len());
    }
    emit(&output, args.output.as_deref())
}
