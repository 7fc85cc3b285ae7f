//! Config command: inspect and edit the scoring defaults

use clap::{Args, Subcommand};

use crate::config::{config_file_path, Config};
use crate::output::{to_json, OutputFormat};
use crate::Cli;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print one value
    Get {
        /// Key: input_format, metric, tokenize, suppress_reentrancy, ignore_entity_types
        key: String,
    },
    /// Change one value
    Set { key: String, value: String },
    /// Print every value
    List,
    /// Print the config file location
    Path,
    /// Write a config file with the defaults
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs, cli: &Cli) -> anyhow::Result<()> {
    let path = config_file_path();
    match &args.command {
        ConfigCommands::Get { key } => {
            let Some(value) = Config::load().get(key) else {
                anyhow::bail!(
                    "Unknown config key: {}. Available keys: {}",
                    key,
                    Config::keys().join(", ")
                );
            };
            println!("{}", value);
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load();
            config.set(key, value)?;
            config.save()?;
            if !cli.quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigCommands::List => {
            let config = Config::load();
            match cli.output_format() {
                OutputFormat::Json => println!("{}", to_json(&config)?),
                OutputFormat::Text => {
                    println!("# {}", path.display());
                    for key in Config::keys() {
                        println!("{} = {}", key, config.get(key).unwrap_or_default());
                    }
                }
            }
        }
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Config::default().save()?;
            println!("Created config file at {}", path.display());
        }
    }
    Ok(())
}
