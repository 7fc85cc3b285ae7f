//! GPGA CLI - score, inspect and convert AMR graph corpora

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{build, completions, convert, paths, report, score};
use config::Config;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "gpga")]
#[command(author, version, about = "Gold path graph alignment for AMR graphs")]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value_t, global = true)]
    pub format: OutputFormat,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        self.format
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score predicted graphs against gold graphs, or write their paths
    Score(score::ScoreArgs),
    /// Print the canonical paths of every graph in a corpus
    Paths(paths::PathsArgs),
    /// Convert a corpus between serializations
    Convert(convert::ConvertArgs),
    /// Build graphs from tokens and construction actions
    Build(build::BuildArgs),
    /// Read a score back from a log file
    Report(report::ReportArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting gpga CLI");

    let config = Config::load();

    match &cli.command {
        Commands::Score(args) => score::run(args, &cli, &config)?,
        Commands::Paths(args) => paths::run(args, &cli, &config)?,
        Commands::Convert(args) => convert::run(args, &config)?,
        Commands::Build(args) => build::run(args, &cli)?,
        Commands::Report(args) => report::run(args, &cli)?,
        Commands::Config(args) => commands::config::run(args, &cli)?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
