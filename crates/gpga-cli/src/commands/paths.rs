//! Paths command: canonical paths of each graph

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use gpga_codec::write_paths;
use gpga_core::{Graph, PathQuery};
use gpga_metric::{AllPaths, CanonOptions, KbFilteredPaths, KbJoinedPaths, Metric, PathSelector, Scorer};
use serde::Serialize;

use super::InputArgs;
use crate::config::Config;
use crate::output::{emit, to_json, OutputFormat};
use crate::Cli;

/// Which paths of a graph to list
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Selection {
    /// Every root-to-leaf path
    #[default]
    All,
    /// Paths through question focus or entities
    Kb,
    /// Paths linking entities to the question focus
    KbJoined,
}

#[derive(Args)]
pub struct PathsArgs {
    /// AMR corpus
    #[arg(long)]
    pub in_amr: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path selection
    #[arg(long, value_enum, default_value = "all")]
    pub select: Selection,

    /// Keep re-entrant nodes only under their first aligned parent
    #[arg(long)]
    pub suppress_reentrancy: bool,

    /// Merge entity names without their entity type
    #[arg(long)]
    pub ignore_entity_types: bool,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Serialize)]
struct SentencePaths<'a> {
    index: usize,
    #[serde(skip)]
    graph: &'a Graph,
    tokens: Vec<&'a str>,
    paths: Vec<String>,
}

pub fn run(args: &PathsArgs, cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let query =
        PathQuery::new().suppress_reentrancy(args.suppress_reentrancy || config.suppress_reentrancy);
    let canon =
        CanonOptions::default().ignore_entity_types(args.ignore_entity_types || config.ignore_entity_types);
    let selector: Box<dyn PathSelector> = match args.select {
        Selection::All => Box::new(AllPaths::new(query)),
        Selection::Kb => Box::new(KbFilteredPaths::new(query)),
        Selection::KbJoined => Box::new(KbJoinedPaths),
    };
    let metric = match args.select {
        Selection::All => Metric::Gpga,
        Selection::Kb | Selection::KbJoined => Metric::GpgaKb,
    };
    let scorer = Scorer::with_selector(metric, selector, canon);

    let sentences = args.input.read(&args.in_amr, config)?;
    let mut listing = Vec::new();
    for (index, sentence) in sentences.iter().enumerate() {
        match sentence {
            Ok(document) => match scorer.paths(&document.graph) {
                Ok(paths) => listing.push(SentencePaths {
                    index,
                    graph: &document.graph,
                    tokens: document.graph.surface_tokens().collect(),
                    paths,
                }),
                Err(e) => tracing::warn!("Skipping paths of sentence {}: {}", index, e),
            },
            Err(e) => tracing::warn!("Skipping {}", e),
        }
    }

    let text = match cli.output_format() {
        OutputFormat::Json => to_json(&listing)? + "\n",
        OutputFormat::Text => {
            let mut buffer = Vec::new();
            write_paths(
                &mut buffer,
                listing.iter().map(|s| (s.graph, s.paths.as_slice())),
            )?;
            String::from_utf8(buffer)?
        }
    };
    emit(&text, args.output.as_deref())
}
