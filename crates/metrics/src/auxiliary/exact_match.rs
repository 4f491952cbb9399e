use lcpeval_core::MetricKind;

use crate::normalize::TextNormalizer;
use crate::results::MetricResultSet;
use crate::scorer::{ScoreError, Scorer};

/// 1.0 when the normalized prediction equals the normalized reference
#[derive(Debug, Clone, Default)]
pub struct ExactMatchScorer {
    normalizer: TextNormalizer,
}

impl ExactMatchScorer {
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn is_exact_match(&self, prediction: &str, reference: &str) -> bool {
        self.normalizer.normalize(prediction) == self.normalizer.normalize(reference)
    }
}

impl Scorer for ExactMatchScorer {
    fn kind(&self) -> MetricKind {
        MetricKind::ExactMatch
    }

    fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    fn compute(&self, prediction: &str, reference: &str) -> Result<f64, ScoreError> {
        Ok(if self.is_exact_match(prediction, reference) {
            1.0
        } else {
            0.0
        })
    }

    fn annotate(&self, _predictions: &[&str], _references: &[&str], results: &mut MetricResultSet) {
        let exact_matches = results.scores().iter().filter(|s| **s == 1.0).count();
        results.add_metadata("exact_matches", exact_matches);
    }
}
