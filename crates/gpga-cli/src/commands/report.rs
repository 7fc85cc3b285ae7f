//! Report command: read a score back from a log file

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use gpga_metric::Metric;

use crate::output::{to_json, OutputFormat};
use crate::Cli;

#[derive(Args)]
pub struct ReportArgs {
    /// Score log file
    pub log: PathBuf,

    /// Metric whose score line to read: gpga, gpga-kb, smatch
    #[arg(long, default_value = "smatch")]
    pub metric: Metric,
}

pub fn run(args: &ReportArgs, cli: &Cli) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.log)
        .with_context(|| format!("Failed to read {}", args.log.display()))?;

    let Some(score) = args.metric.parse_log(&text) else {
        anyhow::bail!("No {} score found in {}", args.metric, args.log.display());
    };

    match cli.output_format() {
        OutputFormat::Json => println!("{}", to_json(&score)?),
        OutputFormat::Text => match score.exact_match {
            Some(exact_match) => println!("{} {:.3} (EM {:.3})", args.metric, score.score, exact_match),
            None => println!("{} {:.3}", args.metric, score.score),
        },
    }
    Ok(())
}
