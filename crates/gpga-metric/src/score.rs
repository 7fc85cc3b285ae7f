//! Sentence and corpus scoring

use std::fmt;

use gpga_core::{unknown_focus, Graph, PathQuery};
use serde::Serialize;

use crate::canon::{canonical_paths, CanonOptions};
use crate::error::{MetricError, MetricResult};
use crate::matcher::greedy_match;
use crate::metric::Metric;
use crate::selector::{AllPaths, KbFilteredPaths, PathSelector};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Scoring options besides the metric itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreOptions {
    pub query: PathQuery,
    pub canon: CanonOptions,
}

/// Per-sentence counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentenceScore {
    pub index: usize,
    pub predicted_paths: usize,
    pub gold_paths: usize,
    pub hits: usize,
    pub misses: usize,
    /// Every gold path was found
    pub exact: bool,
    /// Same number of question-focus nodes on both sides
    pub exact_unknowns: bool,
}

/// Corpus totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusScore {
    pub metric: Metric,
    pub sentences: usize,
    pub predicted_paths: usize,
    pub gold_paths: usize,
    pub hits: usize,
    pub misses: usize,
    pub exact_matches: usize,
    pub exact_unknowns: usize,
    /// Indices of sentences left out of the totals
    pub skipped: Vec<usize>,
}

impl CorpusScore {
    fn add(&mut self, sentence: &SentenceScore) {
        self.sentences += 1;
        self.predicted_paths += sentence.predicted_paths;
        self.gold_paths += sentence.gold_paths;
        self.hits += sentence.hits;
        self.misses += sentence.misses;
        self.exact_matches += usize::from(sentence.exact);
        self.exact_unknowns += usize::from(sentence.exact_unknowns);
    }

    /// Hits over predicted paths; 0 without predictions
    pub fn precision(&self) -> f64 {
        ratio(self.hits, self.predicted_paths)
    }

    pub fn exact_match_rate(&self) -> f64 {
        ratio(self.exact_matches, self.sentences)
    }

    pub fn exact_unknown_rate(&self) -> f64 {
        ratio(self.exact_unknowns, self.sentences)
    }

    /// Summary lines in the score log format
    pub fn report_lines(&self) -> Vec<String> {
        match self.metric {
            Metric::GpgaKb => vec![
                format!(
                    "GPGA-KB: {:.3} (EM {:.3})",
                    self.precision(),
                    self.exact_match_rate()
                ),
                format!(
                    "Unknowns: {}/{} (EM {:.3})",
                    self.exact_unknowns,
                    self.sentences,
                    self.exact_unknown_rate()
                ),
            ],
            _ => vec![format!(
                "GPGA: {:.3} (EM {:.3})",
                self.precision(),
                self.exact_match_rate()
            )],
        }
    }
}

impl fmt::Display for CorpusScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.report_lines().join("\n"))
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Scores graphs with one metric
pub struct Scorer {
    metric: Metric,
    selector: Box<dyn PathSelector>,
    canon: CanonOptions,
}

impl Scorer {
    pub fn new(metric: Metric, options: ScoreOptions) -> MetricResult<Self> {
        if !metric.is_computed() {
            return Err(MetricError::UnsupportedMetric(metric.to_string()));
        }
        let selector: Box<dyn PathSelector> = match metric {
            Metric::GpgaKb => Box::new(KbFilteredPaths::new(options.query)),
            _ => Box::new(AllPaths::new(options.query)),
        };
        Ok(Self {
            metric,
            selector,
            canon: options.canon,
        })
    }

    /// Use a custom selector under the given metric's report format
    pub fn with_selector(metric: Metric, selector: Box<dyn PathSelector>, canon: CanonOptions) -> Self {
        Self {
            metric,
            selector,
            canon,
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Canonical path strings of one graph
    pub fn paths(&self, graph: &Graph) -> MetricResult<Vec<String>> {
        let selected = self.selector.select(graph)?;
        Ok(canonical_paths(graph, &selected, self.canon))
    }

    pub fn score_sentence(&self, index: usize, predicted: &Graph, gold: &Graph) -> MetricResult<SentenceScore> {
        let gold_paths = self.paths(gold)?;
        let predicted_paths = self.paths(predicted)?;
        let matched = greedy_match(&predicted_paths, &gold_paths);

        let gold_unknowns = unknown_focus(gold).ids.len();
        let predicted_unknowns = unknown_focus(predicted).ids.len();

        tracing::trace!(
            "Sentence {}: {} hits of {} gold paths",
            index,
            matched.hits.len(),
            gold_paths.len()
        );
        Ok(SentenceScore {
            index,
            predicted_paths: predicted_paths.len(),
            gold_paths: gold_paths.len(),
            hits: matched.hits.len(),
            misses: matched.misses.len(),
            exact: matched.hits.len() == gold_paths.len(),
            exact_unknowns: gold_unknowns == predicted_unknowns,
        })
    }

    /// Score aligned `(index, predicted, gold)` sentences.
    ///
    /// A sentence that fails to score is skipped and its index recorded.
    pub fn score_corpus(&self, sentences: &[(usize, &Graph, &Graph)]) -> CorpusScore {
        #[cfg(feature = "parallel")]
        let results: Vec<_> = sentences
            .par_iter()
            .map(|(index, predicted, gold)| (*index, self.score_sentence(*index, predicted, gold)))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = sentences
            .iter()
            .map(|(index, predicted, gold)| (*index, self.score_sentence(*index, predicted, gold)))
            .collect();

        let mut corpus = CorpusScore {
            metric: self.metric,
            ..Default::default()
        };
        for (index, result) in results {
            match result {
                Ok(sentence) => corpus.add(&sentence),
                Err(e) => {
                    tracing::warn!("Skipping sentence {}: {}", index, e);
                    corpus.skipped.push(index);
                }
            }
        }
        tracing::debug!(
            "Scored {} sentences ({} skipped)",
            corpus.sentences,
            corpus.skipped.len()
        );
        corpus
    }
}

/// Pair predicted and gold sentences by position.
///
/// Sentences that failed to decode on either side are left out and their
/// indices returned.
pub fn pair_sentences<T, E: fmt::Display>(
    predicted: Vec<Result<T, E>>,
    gold: Vec<Result<T, E>>,
) -> MetricResult<(Vec<(usize, T, T)>, Vec<usize>)> {
    if predicted.len() != gold.len() {
        return Err(MetricError::CorpusMismatch {
            predicted: predicted.len(),
            gold: gold.len(),
        });
    }

    let mut pairs = Vec::with_capacity(gold.len());
    let mut skipped = Vec::new();
    for (index, (predicted, gold)) in predicted.into_iter().zip(gold).enumerate() {
        match (predicted, gold) {
            (Ok(predicted), Ok(gold)) => pairs.push((index, predicted, gold)),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Skipping sentence {}: {}", index, e);
                skipped.push(index);
            }
        }
    }
    Ok((pairs, skipped))
}
