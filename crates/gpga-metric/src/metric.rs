//! Supported metrics and the parsers for their score log lines

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::MetricError;

static GPGA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^GPGA: ([0-9.]+) \(EM ([0-9.]+)\)").expect("valid GPGA log pattern")
});

static GPGA_KB_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^GPGA-KB: ([0-9.]+) \(EM ([0-9.]+)\)").expect("valid GPGA-KB log pattern")
});

static SMATCH_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^F-score: ([0-9.]+)").expect("valid smatch log pattern"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Path precision over all root-to-leaf paths
    #[default]
    Gpga,
    /// Path precision over paths through question focus and entities
    GpgaKb,
    /// Read from logs only
    Smatch,
}

/// Scores read back from a log line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogScore {
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_match: Option<f64>,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Gpga, Metric::GpgaKb, Metric::Smatch];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Gpga => "gpga",
            Metric::GpgaKb => "gpga-kb",
            Metric::Smatch => "smatch",
        }
    }

    /// Whether this crate can compute the metric, not just read it
    pub fn is_computed(&self) -> bool {
        !matches!(self, Metric::Smatch)
    }

    pub fn parse_line(&self, line: &str) -> Option<LogScore> {
        match self {
            Metric::Gpga => parse_gpga_line(line),
            Metric::GpgaKb => parse_gpga_kb_line(line),
            Metric::Smatch => parse_smatch_line(line),
        }
    }

    /// First score line of a log
    pub fn parse_log(&self, text: &str) -> Option<LogScore> {
        text.lines().find_map(|line| self.parse_line(line))
    }
}

impl FromStr for Metric {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MetricError::UnsupportedMetric(s.to_string()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn parse_gpga_line(line: &str) -> Option<LogScore> {
    with_exact_match(&GPGA_LINE, line)
}

fn parse_gpga_kb_line(line: &str) -> Option<LogScore> {
    with_exact_match(&GPGA_KB_LINE, line)
}

fn parse_smatch_line(line: &str) -> Option<LogScore> {
    let captures = SMATCH_LINE.captures(line)?;
    Some(LogScore {
        score: captures[1].parse().ok()?,
        exact_match: None,
    })
}

fn with_exact_match(pattern: &Regex, line: &str) -> Option<LogScore> {
    let captures = pattern.captures(line)?;
    Some(LogScore {
        score: captures[1].parse().ok()?,
        exact_match: Some(captures[2].parse().ok()?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert_eq!("gpga".parse::<Metric>(), Ok(Metric::Gpga));
        assert_eq!("GPGA-KB".parse::<Metric>(), Ok(Metric::GpgaKb));
        assert_eq!("smatch".parse::<Metric>(), Ok(Metric::Smatch));
        assert_eq!(
            "las".parse::<Metric>(),
            Err(MetricError::UnsupportedMetric("las".into()))
        );
        assert_eq!(Metric::GpgaKb.to_string(), "gpga-kb");
    }

    #[test]
    fn test_parse_log_lines() {
        let log = "Reading corpus\nGPGA-KB: 0.650 (EM 0.200)\nUnknowns: 8/10 (EM 0.800)\nGPGA: 0.812 (EM 0.400)\n";

        assert_eq!(
            Metric::Gpga.parse_log(log),
            Some(LogScore { score: 0.812, exact_match: Some(0.4) })
        );
        assert_eq!(Metric::GpgaKb.parse_log(log).map(|s| s.score), Some(0.65));
        assert_eq!(Metric::Smatch.parse_log(log), None);
        assert_eq!(
            Metric::Smatch.parse_line("F-score: 0.71"),
            Some(LogScore { score: 0.71, exact_match: None })
        );
    }

    #[test]
    fn test_line_must_start_with_marker() {
        assert_eq!(Metric::Gpga.parse_line("  GPGA: 0.5 (EM 0.1)"), None);
        assert_eq!(Metric::Gpga.parse_line("GPGA-KB: 0.5 (EM 0.1)"), None);
    }
}
