//! Greedy one-to-one matching of canonical path strings

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Gold paths found among the predicted paths
    pub hits: Vec<String>,
    /// Predicted paths left without a gold counterpart
    pub misses: Vec<String>,
}

/// Match every gold path against a distinct predicted path, ignoring case
pub fn greedy_match(predicted: &[String], gold: &[String]) -> MatchResult {
    let mut remaining: Vec<(String, &String)> = predicted
        .iter()
        .map(|path| (path.to_lowercase(), path))
        .collect();

    let mut hits = Vec::new();
    for path in gold {
        let lowered = path.to_lowercase();
        if let Some(position) = remaining.iter().position(|(p, _)| *p == lowered) {
            remaining.remove(position);
            hits.push(path.clone());
        }
    }

    MatchResult {
        hits,
        misses: remaining.into_iter().map(|(_, path)| path.clone()).collect(),
    }
}
