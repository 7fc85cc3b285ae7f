//! Output formatting utilities

use clap::ValueEnum;
use serde::Serialize;

/// Output format of commands that print results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Pretty JSON for `--format json`
pub fn to_json<T: Serialize>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Write to `path`, or to stdout when no path is given
pub fn emit(text: &str, path: Option<&std::path::Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, text)?;
            tracing::info!("Wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
