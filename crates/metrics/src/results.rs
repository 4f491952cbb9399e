//! Per-metric score sequences and their summary statistics

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Summary statistics over a score sequence
///
/// All fields are 0.0 for an empty sequence. The standard deviation is the
/// population form (divides by `count`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreStats {
    #[serde(rename = "aggregate_score")]
    pub mean: f64,
    pub std_dev: f64,
    #[serde(rename = "min_score")]
    pub min: f64,
    #[serde(rename = "max_score")]
    pub max: f64,
    #[serde(rename = "num_samples")]
    pub count: usize,
}

impl ScoreStats {
    pub fn from_scores(scores: &[f64]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }

        let count = scores.len();
        let mean = scores.iter().sum::<f64>() / count as f64;
        let variance = scores
            .iter()
            .map(|score| {
                let delta = score - mean;
                delta * delta
            })
            .sum::<f64>()
            / count as f64;
        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
            count,
        }
    }
}

/// A pair that fell back to a 0.0 score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreFailure {
    /// Position of the pair in the input sequences
    pub index: usize,
    pub message: String,
}

/// Scores for one metric run with cached statistics and free-form metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MetricResultSet {
    scores: Vec<f64>,
    #[serde(flatten)]
    stats: ScoreStats,
    metadata: BTreeMap<String, Value>,
    #[serde(skip)]
    failures: Vec<ScoreFailure>,
}

impl MetricResultSet {
    /// Builds a result set, computing statistics eagerly
    pub fn new(scores: Vec<f64>) -> Self {
        let stats = ScoreStats::from_scores(&scores);
        Self {
            scores,
            stats,
            metadata: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    /// Appends one score and recomputes the statistics over the full sequence
    pub fn add_score(&mut self, score: f64) {
        self.scores.push(score);
        self.stats = ScoreStats::from_scores(&self.scores);
    }

    /// Inserts or replaces a metadata entry
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub(crate) fn record_failure(&mut self, failure: ScoreFailure) {
        self.failures.push(failure);
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn stats(&self) -> ScoreStats {
        self.stats
    }

    /// Mean score
    pub fn aggregate_score(&self) -> f64 {
        self.stats.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.stats.std_dev
    }

    pub fn min_score(&self) -> f64 {
        self.stats.min
    }

    pub fn max_score(&self) -> f64 {
        self.stats.max
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Pairs whose score was replaced by the 0.0 fallback
    pub fn failures(&self) -> &[ScoreFailure] {
        &self.failures
    }

    /// True when the scorer reported its backend unavailable
    pub fn is_degraded(&self) -> bool {
        self.metadata
            .get("degraded")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
