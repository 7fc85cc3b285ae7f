//! CLI command implementations

pub mod build;
pub mod completions;
pub mod config;
pub mod convert;
pub mod paths;
pub mod report;
pub mod score;

use std::path::Path;

use clap::Args;
use gpga_codec::{read_corpus_file, InputFormat, ReadOptions, SentenceResult};

use crate::config::Config;

/// How input corpora are read; unset flags fall back to the config file
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Block format: penman, metadata
    #[arg(long)]
    pub input_format: Option<InputFormat>,

    /// Read `::node`/`::edge` records (same as --input-format metadata)
    #[arg(long, conflicts_with = "input_format")]
    pub ibm_format: bool,

    /// Re-tokenize from the `::snt` field
    #[arg(long)]
    pub tokenize: bool,
}

impl InputArgs {
    pub fn read_options(&self, config: &Config) -> ReadOptions {
        let format = if self.ibm_format {
            InputFormat::Metadata
        } else {
            self.input_format.unwrap_or(config.input_format)
        };
        ReadOptions::new(format).tokenize(self.tokenize || config.tokenize)
    }

    pub fn read(&self, path: &Path, config: &Config) -> anyhow::Result<Vec<SentenceResult>> {
        let options = self.read_options(config);
        tracing::info!("Reading {} ({})", path.display(), options.format);
        Ok(read_corpus_file(path, options)?)
    }
}
