//! Score command: GPGA between a predicted and a gold corpus

use std::path::PathBuf;

use clap::Args;
use gpga_codec::write_paths_file;
use gpga_core::PathQuery;
use gpga_metric::{pair_sentences, CanonOptions, CorpusScore, Metric, ScoreOptions, Scorer};
use serde::Serialize;

use super::InputArgs;
use crate::config::Config;
use crate::output::{to_json, OutputFormat};
use crate::Cli;

#[derive(Args)]
pub struct ScoreArgs {
    /// Predicted AMR corpus
    #[arg(long)]
    pub in_amr: PathBuf,

    /// Gold AMR corpus
    #[arg(long, required_unless_present = "out_paths", conflicts_with = "out_paths")]
    pub in_gold_amr: Option<PathBuf>,

    /// Write the canonical paths of --in-amr here instead of scoring
    #[arg(long)]
    pub out_paths: Option<PathBuf>,

    /// Metric: gpga, gpga-kb
    #[arg(long)]
    pub metric: Option<Metric>,

    /// Only score paths through question focus and entities (gpga-kb)
    #[arg(long, conflicts_with = "metric")]
    pub kb_only: bool,

    /// Keep re-entrant nodes only under their first aligned parent
    #[arg(long)]
    pub suppress_reentrancy: bool,

    /// Merge entity names without their entity type
    #[arg(long)]
    pub ignore_entity_types: bool,

    #[command(flatten)]
    pub input: InputArgs,
}

impl ScoreArgs {
    /// Build the scorer first so an unsupported metric fails before any file is read
    pub fn scorer(&self, config: &Config) -> anyhow::Result<Scorer> {
        let metric = if self.kb_only {
            Metric::GpgaKb
        } else {
            self.metric.unwrap_or(config.metric)
        };
        let options = ScoreOptions {
            query: PathQuery::new()
                .suppress_reentrancy(self.suppress_reentrancy || config.suppress_reentrancy),
            canon: CanonOptions::default()
                .ignore_entity_types(self.ignore_entity_types || config.ignore_entity_types),
        };
        Ok(Scorer::new(metric, options)?)
    }
}

#[derive(Serialize)]
struct ScoreReport<'a> {
    #[serde(flatten)]
    corpus: &'a CorpusScore,
    precision: f64,
    exact_match_rate: f64,
    exact_unknown_rate: f64,
}

pub fn run(args: &ScoreArgs, cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let scorer = args.scorer(config)?;
    let predicted = args.input.read(&args.in_amr, config)?;

    if let Some(out_paths) = &args.out_paths {
        let mut listing = Vec::new();
        for sentence in &predicted {
            let document = match sentence {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("Skipping {}", e);
                    continue;
                }
            };
            match scorer.paths(&document.graph) {
                Ok(paths) => listing.push((&document.graph, paths)),
                Err(e) => tracing::warn!("Skipping paths of a sentence: {}", e),
            }
        }
        write_paths_file(
            out_paths,
            listing.iter().map(|(graph, paths)| (*graph, paths.as_slice())),
        )?;
        if !cli.quiet {
            eprintln!("Wrote paths of {} sentences to {}", listing.len(), out_paths.display());
        }
        return Ok(());
    }

    let Some(gold_path) = &args.in_gold_amr else {
        anyhow::bail!("Either --in-gold-amr or --out-paths is required");
    };
    let gold = args.input.read(gold_path, config)?;

    let (pairs, skipped) = pair_sentences(predicted, gold)?;
    let sentences: Vec<_> = pairs
        .iter()
        .map(|(index, predicted, gold)| (*index, &predicted.graph, &gold.graph))
        .collect();
    let mut corpus = scorer.score_corpus(&sentences);
    corpus.skipped.extend(skipped);
    corpus.skipped.sort_unstable();

    match cli.output_format() {
        OutputFormat::Json => {
            let report = ScoreReport {
                corpus: &corpus,
                precision: corpus.precision(),
                exact_match_rate: corpus.exact_match_rate(),
                exact_unknown_rate: corpus.exact_unknown_rate(),
            };
            println!("{}", to_json(&report)?);
        }
        OutputFormat::Text => {
            println!("{}", corpus);
            if !corpus.skipped.is_empty() && !cli.quiet {
                eprintln!(
                    "Skipped {} sentences: {:?}",
                    corpus.skipped.len(),
                    corpus.skipped
                );
            }
        }
    }
    Ok(())
}
