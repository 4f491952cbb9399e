//! The scorer seam shared by every metric
//!
//! A scorer turns one (prediction, reference) pair into a number. Batch
//! scoring is provided on top of that: pairs are scored independently, a pair
//! that fails is recorded and scored 0.0, and the scorer may then attach
//! metric-specific metadata to the finished result set.

use lcpeval_core::error::{Error, Result};
use lcpeval_core::MetricKind;
use rayon::prelude::*;
use thiserror::Error as ThisError;
use tracing::warn;

use crate::normalize::TextNormalizer;
use crate::results::{MetricResultSet, ScoreFailure};

/// Recoverable failure while scoring a single pair
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum ScoreError {
    /// The pair is too large for the scorer's working table
    #[error(
        "input too large: {prediction_len} x {reference_len} characters exceeds limit of {limit} cells"
    )]
    InputTooLarge {
        prediction_len: usize,
        reference_len: usize,
        limit: usize,
    },

    /// A collaborator the scorer relies on cannot be used
    #[error("{scorer} scorer unavailable: {reason}")]
    Unavailable { scorer: MetricKind, reason: String },

    /// Any other per-pair fault
    #[error("score computation failed: {0}")]
    Computation(String),
}

impl ScoreError {
    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }

    pub fn unavailable(scorer: MetricKind, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            scorer,
            reason: reason.into(),
        }
    }
}

/// A metric over (prediction, reference) pairs
pub trait Scorer: Send + Sync {
    /// Identifier this scorer reports under
    fn kind(&self) -> MetricKind;

    /// Preprocessing applied to both sides of every pair
    fn normalizer(&self) -> &TextNormalizer;

    /// Score a single pair
    fn compute(&self, prediction: &str, reference: &str) -> std::result::Result<f64, ScoreError>;

    /// Attach metric-specific metadata once every pair has been scored
    fn annotate(
        &self,
        _predictions: &[&str],
        _references: &[&str],
        _results: &mut MetricResultSet,
    ) {}

    /// Score aligned sequences of predictions and references
    ///
    /// Output order matches input order regardless of `parallel`.
    fn compute_batch(
        &self,
        predictions: &[&str],
        references: &[&str],
        parallel: bool,
    ) -> Result<MetricResultSet> {
        ensure_aligned(predictions.len(), references.len())?;
        let mut results = score_pairs(self, predictions, references, parallel);
        self.annotate(predictions, references, &mut results);
        Ok(results)
    }
}

/// Fails with [`Error::ShapeMismatch`] unless both sides have the same length
pub fn ensure_aligned(predictions: usize, references: usize) -> Result<()> {
    if predictions != references {
        return Err(Error::shape_mismatch(predictions, references));
    }
    Ok(())
}

/// Scores every pair, substituting 0.0 for pairs that fail.
///
/// Statistics are computed once, after all scores are collected.
pub(crate) fn score_pairs<S: Scorer + ?Sized>(
    scorer: &S,
    predictions: &[&str],
    references: &[&str],
    parallel: bool,
) -> MetricResultSet {
    let kind = scorer.kind();

    let outcomes: Vec<std::result::Result<f64, ScoreError>> = if parallel {
        predictions
            .par_iter()
            .zip(references.par_iter())
            .map(|(prediction, reference)| scorer.compute(prediction, reference))
            .collect()
    } else {
        predictions
            .iter()
            .zip(references.iter())
            .map(|(prediction, reference)| scorer.compute(prediction, reference))
            .collect()
    };

    let mut scores = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    let mut degraded_reason: Option<String> = None;
    let mut degraded_pairs = 0usize;

    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(score) => scores.push(score),
            Err(ScoreError::Unavailable { reason, .. }) => {
                degraded_pairs += 1;
                degraded_reason.get_or_insert(reason);
                scores.push(0.0);
            }
            Err(err) => {
                warn!(
                    metric = %kind,
                    index,
                    error = %err,
                    "Error computing score for pair, recording 0.0"
                );
                failures.push(ScoreFailure {
                    index,
                    message: err.to_string(),
                });
                scores.push(0.0);
            }
        }
    }

    let total = scores.len();
    let mut results = MetricResultSet::new(scores);
    results.add_metadata("metric_name", kind.id());
    results.add_metadata("num_valid_scores", total - failures.len() - degraded_pairs);

    if let Some(reason) = degraded_reason {
        warn!(metric = %kind, %reason, "Scorer unavailable, reporting 0.0 for affected pairs");
        results.add_metadata("degraded", true);
        results.add_metadata("degraded_reason", reason);
    }

    if !failures.is_empty() {
        let indices: Vec<usize> = failures.iter().map(|failure| failure.index).collect();
        results.add_metadata("failed_pairs", indices);
        for failure in failures {
            results.record_failure(failure);
        }
    }

    results
}
