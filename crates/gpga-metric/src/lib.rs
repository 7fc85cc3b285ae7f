//! GPGA Metric - gold path graph alignment scoring
//!
//! Graphs are reduced to canonical root-to-leaf path strings which are then
//! matched greedily against the reference graph's paths.

pub mod canon;
pub mod error;
pub mod matcher;
pub mod metric;
pub mod score;
pub mod selector;

pub use canon::{canonical_paths, canonicalize, CanonOptions, PathRenderer};
pub use error::{MetricError, MetricResult};
pub use matcher::{greedy_match, MatchResult};
pub use metric::{LogScore, Metric};
pub use score::{pair_sentences, CorpusScore, ScoreOptions, Scorer, SentenceScore};
pub use selector::{AllPaths, KbFilteredPaths, KbJoinedPaths, PathIds, PathSelector};
