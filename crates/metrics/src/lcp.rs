//! Longest common prefix (LCP) metric
//!
//! LCP counts the leading characters a completion gets right before its first
//! mistake, which tracks how much of a suggestion a user can accept as-is.

use lcpeval_core::MetricKind;

use crate::normalize::{NormalizedText, TextNormalizer};
use crate::results::MetricResultSet;
use crate::scorer::{ScoreError, Scorer};

/// Number of leading characters shared by two normalized strings
pub fn longest_common_prefix(prediction: &NormalizedText, reference: &NormalizedText) -> usize {
    prediction
        .as_str()
        .chars()
        .zip(reference.as_str().chars())
        .take_while(|(p, r)| p == r)
        .count()
}

/// Character coverage of a batch of LCP scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrefixCoverage {
    pub total_reference_chars: usize,
    pub total_matched_chars: usize,
    /// `total_matched_chars / total_reference_chars`, 0.0 when there are no reference characters
    pub coverage_rate: f64,
}

impl PrefixCoverage {
    pub fn new(total_matched_chars: usize, total_reference_chars: usize) -> Self {
        let coverage_rate = if total_reference_chars > 0 {
            total_matched_chars as f64 / total_reference_chars as f64
        } else {
            0.0
        };
        Self {
            total_reference_chars,
            total_matched_chars,
            coverage_rate,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LcpScorer {
    normalizer: TextNormalizer,
}

impl LcpScorer {
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self { normalizer }
    }

    /// LCP length after normalizing both sides with the same settings
    pub fn lcp(&self, prediction: &str, reference: &str) -> usize {
        longest_common_prefix(
            &self.normalizer.normalize(prediction),
            &self.normalizer.normalize(reference),
        )
    }

    /// Total matched characters over total normalized reference characters
    pub fn coverage(&self, predictions: &[&str], references: &[&str]) -> PrefixCoverage {
        let matched = predictions
            .iter()
            .zip(references)
            .map(|(prediction, reference)| self.lcp(prediction, reference))
            .sum();
        PrefixCoverage::new(matched, self.total_reference_chars(references))
    }

    fn total_reference_chars(&self, references: &[&str]) -> usize {
        references
            .iter()
            .map(|reference| self.normalizer.normalized_len(reference))
            .sum()
    }
}

impl Scorer for LcpScorer {
    fn kind(&self) -> MetricKind {
        MetricKind::Lcp
    }

    fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    fn compute(&self, prediction: &str, reference: &str) -> Result<f64, ScoreError> {
        Ok(self.lcp(prediction, reference) as f64)
    }

    fn annotate(&self, _predictions: &[&str], references: &[&str], results: &mut MetricResultSet) {
        // Matched characters come from the recorded scores so fallbacks are reflected
        let matched = results.scores().iter().sum::<f64>() as usize;
        let coverage = PrefixCoverage::new(matched, self.total_reference_chars(references));

        results.add_metadata("total_reference_chars", coverage.total_reference_chars);
        results.add_metadata("total_lcp_chars", coverage.total_matched_chars);
        results.add_metadata("lcp_coverage_rate", coverage.coverage_rate);
    }
}
