use lcpeval_core::MetricKind;

use crate::normalize::TextNormalizer;
use crate::scorer::{ScoreError, Scorer};

/// Length of the longest common subsequence of two character sequences.
///
/// Classic O(m·n) dynamic programme, keeping only the previous row.
pub fn lcs_length(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Character-level ROUGE-L F1, scaled to 0-100
#[derive(Debug, Clone)]
pub struct RougeLScorer {
    normalizer: TextNormalizer,
    max_cells: usize,
}

impl RougeLScorer {
    pub fn new(normalizer: TextNormalizer, max_cells: usize) -> Self {
        Self {
            normalizer,
            max_cells,
        }
    }
}

impl Default for RougeLScorer {
    fn default() -> Self {
        Self::new(TextNormalizer::default(), 16 * 1024 * 1024)
    }
}

impl Scorer for RougeLScorer {
    fn kind(&self) -> MetricKind {
        MetricKind::RougeL
    }

    fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    fn compute(&self, prediction: &str, reference: &str) -> Result<f64, ScoreError> {
        let prediction = self.normalizer.normalize(prediction).to_chars();
        let reference = self.normalizer.normalize(reference).to_chars();

        if prediction.is_empty() || reference.is_empty() {
            return Ok(0.0);
        }

        let cells = prediction.len().checked_mul(reference.len());
        if cells.is_none_or(|cells| cells > self.max_cells) {
            return Err(ScoreError::InputTooLarge {
                prediction_len: prediction.len(),
                reference_len: reference.len(),
                limit: self.max_cells,
            });
        }

        let lcs = lcs_length(&prediction, &reference);
        if lcs == 0 {
            return Ok(0.0);
        }

        let precision = lcs as f64 / prediction.len() as f64;
        let recall = lcs as f64 / reference.len() as f64;
        if precision + recall == 0.0 {
            return Ok(0.0);
        }

        Ok(2.0 * precision * recall / (precision + recall) * 100.0)
    }
}
