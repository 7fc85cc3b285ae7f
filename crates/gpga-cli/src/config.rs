//! CLI configuration stored as TOML

use std::path::PathBuf;

use anyhow::Context;
use gpga_codec::InputFormat;
use gpga_metric::Metric;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "GPGA_CONFIG";

/// Path of the config file: `$GPGA_CONFIG` or `<config dir>/gpga/config.toml`
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gpga")
        .join("config.toml")
}

/// Defaults applied when a command-line flag is not given
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input_format: InputFormat,
    pub metric: Metric,
    pub tokenize: bool,
    pub suppress_reentrancy: bool,
    pub ignore_entity_types: bool,
}

impl Config {
    /// Load the config file, falling back to defaults when it is missing or invalid
    pub fn load() -> Self {
        let path = config_file_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &[
            "input_format",
            "metric",
            "tokenize",
            "suppress_reentrancy",
            "ignore_entity_types",
        ]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "input_format" => Some(self.input_format.to_string()),
            "metric" => Some(self.metric.to_string()),
            "tokenize" => Some(self.tokenize.to_string()),
            "suppress_reentrancy" => Some(self.suppress_reentrancy.to_string()),
            "ignore_entity_types" => Some(self.ignore_entity_types.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "input_format" => self.input_format = value.parse().map_err(anyhow::Error::msg)?,
            "metric" => self.metric = value.parse()?,
            "tokenize" => self.tokenize = parse_bool(key, value)?,
            "suppress_reentrancy" => self.suppress_reentrancy = parse_bool(key, value)?,
            "ignore_entity_types" => self.ignore_entity_types = parse_bool(key, value)?,
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> anyhow::Result<bool> {
    value
        .parse()
        .with_context(|| format!("{} expects true or false, got {:?}", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();
        config.set("metric", "gpga-kb").unwrap();
        config.set("input_format", "metadata").unwrap();
        config.set("tokenize", "true").unwrap();

        assert_eq!(config.get("metric").as_deref(), Some("gpga-kb"));
        assert_eq!(config.get("input_format").as_deref(), Some("metadata"));
        assert!(config.tokenize);
        assert!(config.set("metric", "bleu").is_err());
        assert!(config.set("tokenize", "yes").is_err());
        assert!(config.set("colour", "red").is_err());
        assert_eq!(config.get("colour"), None);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config {
            metric: Metric::GpgaKb,
            suppress_reentrancy: true,
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("metric = \"gpga-kb\""));
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), config);
        assert_eq!(toml::from_str::<Config>("").unwrap(), Config::default());
    }
}
