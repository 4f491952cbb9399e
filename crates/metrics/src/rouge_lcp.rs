//! ROUGE-LCP: LCP normalized by the reference length
//!
//! `ROUGE-LCP(S, R) = LCP(S, R) / |R|` where `|R|` is the normalized reference
//! length. An empty reference scores 0.0. The score is not clamped: 1.0 means
//! the whole reference was reproduced as a prefix.

use lcpeval_core::error::Result;
use lcpeval_core::MetricKind;
use serde::Serialize;
use std::collections::BTreeMap;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::lcp::{longest_common_prefix, LcpScorer};
use crate::normalize::TextNormalizer;
use crate::results::MetricResultSet;
use crate::scorer::{ensure_aligned, ScoreError, Scorer};

#[derive(Debug, Clone, Default)]
pub struct RougeLcpScorer {
    lcp: LcpScorer,
}

impl RougeLcpScorer {
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self {
            lcp: LcpScorer::new(normalizer),
        }
    }

    pub fn rouge_lcp(&self, prediction: &str, reference: &str) -> f64 {
        let normalizer = self.lcp.normalizer();
        let reference = normalizer.normalize(reference);
        if reference.is_empty() {
            return 0.0;
        }
        let prediction = normalizer.normalize(prediction);
        longest_common_prefix(&prediction, &reference) as f64 / reference.len() as f64
    }

    /// True when the prediction reproduces the whole reference and keeps going
    pub fn is_prefix_extension(&self, prediction: &str, reference: &str) -> bool {
        let normalizer = self.lcp.normalizer();
        let reference = normalizer.normalize(reference);
        let prediction = normalizer.normalize(prediction);
        !reference.is_empty()
            && prediction.len() > reference.len()
            && longest_common_prefix(&prediction, &reference) == reference.len()
    }

    /// Buckets the ROUGE-LCP score of every pair into fixed quality bands
    pub fn analyze_distribution(
        &self,
        predictions: &[&str],
        references: &[&str],
    ) -> Result<DistributionReport> {
        ensure_aligned(predictions.len(), references.len())?;
        let scores: Vec<f64> = predictions
            .iter()
            .zip(references)
            .map(|(prediction, reference)| self.rouge_lcp(prediction, reference))
            .collect();
        Ok(DistributionReport::from_scores(&scores))
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total > 0 {
        count as f64 / total as f64
    } else {
        0.0
    }
}

impl Scorer for RougeLcpScorer {
    fn kind(&self) -> MetricKind {
        MetricKind::RougeLcp
    }

    fn normalizer(&self) -> &TextNormalizer {
        self.lcp.normalizer()
    }

    fn compute(&self, prediction: &str, reference: &str) -> std::result::Result<f64, ScoreError> {
        Ok(self.rouge_lcp(prediction, reference))
    }

    fn annotate(&self, predictions: &[&str], references: &[&str], results: &mut MetricResultSet) {
        let normalizer = self.lcp.normalizer();
        let lcp_scores: Vec<usize> = predictions
            .iter()
            .zip(references)
            .map(|(prediction, reference)| self.lcp.lcp(prediction, reference))
            .collect();
        let reference_lengths: Vec<usize> = references
            .iter()
            .map(|reference| normalizer.normalized_len(reference))
            .collect();
        let mean_reference_length = if reference_lengths.is_empty() {
            0.0
        } else {
            reference_lengths.iter().sum::<usize>() as f64 / reference_lengths.len() as f64
        };

        let total = results.len();
        let exact_matches = results.scores().iter().filter(|s| **s >= 1.0).count();
        let extensions = results.scores().iter().filter(|s| **s > 1.0).count();
        let prefix_extensions = predictions
            .iter()
            .zip(references)
            .filter(|(prediction, reference)| self.is_prefix_extension(prediction, reference))
            .count();

        results.add_metadata("lcp_scores", lcp_scores);
        results.add_metadata("reference_lengths", reference_lengths);
        results.add_metadata("mean_reference_length", mean_reference_length);
        results.add_metadata("exact_matches", exact_matches);
        results.add_metadata("exact_match_rate", rate(exact_matches, total));
        results.add_metadata("extensions", extensions);
        results.add_metadata("extension_rate", rate(extensions, total));
        results.add_metadata("prefix_extensions", prefix_extensions);
        results.add_metadata("prefix_extension_rate", rate(prefix_extensions, total));
    }
}

/// Named score ranges used by the distribution report
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QualityBand {
    /// Exactly 1.0
    PerfectMatch,
    /// [0.8, 1.0)
    HighQuality,
    /// [0.6, 0.8)
    GoodQuality,
    /// [0.4, 0.6)
    MediumQuality,
    /// [0.2, 0.4)
    LowQuality,
    /// Below 0.2
    PoorQuality,
    /// Above 1.0
    Extensions,
}

impl QualityBand {
    /// The single band a score belongs to
    pub fn classify(score: f64) -> Self {
        if score > 1.0 {
            QualityBand::Extensions
        } else if score == 1.0 {
            QualityBand::PerfectMatch
        } else if score >= 0.8 {
            QualityBand::HighQuality
        } else if score >= 0.6 {
            QualityBand::GoodQuality
        } else if score >= 0.4 {
            QualityBand::MediumQuality
        } else if score >= 0.2 {
            QualityBand::LowQuality
        } else {
            QualityBand::PoorQuality
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandCount {
    pub count: usize,
    pub percentage: f64,
}

/// Distribution of ROUGE-LCP scores across [`QualityBand`]s
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionReport {
    pub score_distribution: BTreeMap<QualityBand, BandCount>,
    pub total_samples: usize,
    pub mean_score: f64,
    /// Upper median: element `n / 2` of the sorted scores
    pub median_score: f64,
}

impl DistributionReport {
    pub fn from_scores(scores: &[f64]) -> Self {
        let total_samples = scores.len();

        let mut counts: BTreeMap<QualityBand, usize> =
            QualityBand::iter().map(|band| (band, 0)).collect();
        for score in scores {
            *counts.entry(QualityBand::classify(*score)).or_insert(0) += 1;
        }

        let score_distribution = counts
            .into_iter()
            .map(|(band, count)| {
                let percentage = rate(count, total_samples) * 100.0;
                (band, BandCount { count, percentage })
            })
            .collect();

        let (mean_score, median_score) = if scores.is_empty() {
            (0.0, 0.0)
        } else {
            let mut sorted = scores.to_vec();
            sorted.sort_by(f64::total_cmp);
            (
                scores.iter().sum::<f64>() / total_samples as f64,
                sorted[total_samples / 2],
            )
        };

        Self {
            score_distribution,
            total_samples,
            mean_score,
            median_score,
        }
    }

    pub fn count(&self, band: QualityBand) -> usize {
        self.score_distribution
            .get(&band)
            .map(|bucket| bucket.count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_partial_prefix_score() {
        let scorer = RougeLcpScorer::default();
        let score = scorer.rouge_lcp("def function(", "def function(param):");
        assert!(approx(score, 13.0 / 20.0));
    }

    #[test]
    fn test_perfect_match_is_one() {
        let scorer = RougeLcpScorer::default();
        assert_eq!(
            scorer.rouge_lcp("def function(param):", "def function(param):"),
            1.0
        );
    }

    #[test]
    fn test_empty_reference_scores_zero() {
        let scorer = RougeLcpScorer::default();
        assert_eq!(scorer.rouge_lcp("anything", ""), 0.0);
        assert_eq!(scorer.rouge_lcp("anything", "\n\n"), 0.0);
        assert_eq!(scorer.rouge_lcp("", "anything"), 0.0);
    }

    #[test]
    fn test_longer_reference_lowers_score() {
        let scorer = RougeLcpScorer::default();
        let short = scorer.rouge_lcp("abc", "abcd");
        let long = scorer.rouge_lcp("abc", "abcdefgh");
        assert!(short > long);
    }

    #[test]
    fn test_prediction_continuing_past_reference() {
        let scorer = RougeLcpScorer::default();
        assert_eq!(scorer.rouge_lcp("abc extra", "abc"), 1.0);
        assert!(scorer.is_prefix_extension("abc extra", "abc"));
        assert!(!scorer.is_prefix_extension("abc", "abc"));
        assert!(!scorer.is_prefix_extension("abd extra", "abc"));
        assert!(!scorer.is_prefix_extension("abc", ""));
    }

    #[test]
    fn test_batch_metadata_flags_exact_matches_and_extensions() {
        let scorer = RougeLcpScorer::default();
        let predictions = ["abc extra", "abc", "ab", "zzz"];
        let references = ["abc", "abc", "abcd", "abc"];
        let results = scorer
            .compute_batch(&predictions, &references, false)
            .unwrap();

        assert_eq!(results.scores(), &[1.0, 1.0, 0.5, 0.0]);
        assert_eq!(results.metadata_value("exact_matches"), Some(&json!(2)));
        assert_eq!(
            results.metadata_value("exact_match_rate"),
            Some(&json!(0.5))
        );
        assert_eq!(results.metadata_value("extensions"), Some(&json!(0)));
        assert_eq!(results.metadata_value("extension_rate"), Some(&json!(0.0)));
        assert_eq!(results.metadata_value("prefix_extensions"), Some(&json!(1)));
        assert_eq!(
            results.metadata_value("prefix_extension_rate"),
            Some(&json!(0.25))
        );
        assert_eq!(
            results.metadata_value("lcp_scores"),
            Some(&json!([3, 3, 2, 0]))
        );
        assert_eq!(
            results.metadata_value("reference_lengths"),
            Some(&json!([3, 3, 4, 3]))
        );
        assert_eq!(
            results.metadata_value("mean_reference_length"),
            Some(&json!(3.25))
        );
    }

    #[test]
    fn test_classify_band_boundaries() {
        assert_eq!(QualityBand::classify(1.5), QualityBand::Extensions);
        assert_eq!(QualityBand::classify(1.0), QualityBand::PerfectMatch);
        assert_eq!(QualityBand::classify(0.995), QualityBand::HighQuality);
        assert_eq!(QualityBand::classify(0.8), QualityBand::HighQuality);
        assert_eq!(QualityBand::classify(0.795), QualityBand::GoodQuality);
        assert_eq!(QualityBand::classify(0.6), QualityBand::GoodQuality);
        assert_eq!(QualityBand::classify(0.4), QualityBand::MediumQuality);
        assert_eq!(QualityBand::classify(0.2), QualityBand::LowQuality);
        assert_eq!(QualityBand::classify(0.195), QualityBand::PoorQuality);
        assert_eq!(QualityBand::classify(0.0), QualityBand::PoorQuality);
    }

    #[test]
    fn test_distribution_partitions_scores() {
        let scores = [1.0, 0.9, 0.7, 0.5, 0.3, 0.1, 1.2, 0.0, 0.99, 0.2];
        let report = DistributionReport::from_scores(&scores);

        let total: usize = report.score_distribution.values().map(|b| b.count).sum();
        assert_eq!(total, scores.len());
        assert_eq!(report.score_distribution.len(), 7);
        assert_eq!(report.count(QualityBand::HighQuality), 2);
        assert_eq!(report.count(QualityBand::PoorQuality), 2);
        assert_eq!(report.count(QualityBand::Extensions), 1);
        assert_eq!(report.count(QualityBand::LowQuality), 2);
    }

    #[test]
    fn test_distribution_summary_values() {
        let report = DistributionReport::from_scores(&[0.0, 1.0, 0.5, 0.25]);
        assert_eq!(report.total_samples, 4);
        assert!(approx(report.mean_score, 0.4375));
        assert_eq!(report.median_score, 0.5);
        assert_eq!(
            report.score_distribution[&QualityBand::PerfectMatch].percentage,
            25.0
        );
    }

    #[test]
    fn test_distribution_of_empty_batch() {
        let report = DistributionReport::from_scores(&[]);
        assert_eq!(report.total_samples, 0);
        assert_eq!(report.mean_score, 0.0);
        assert_eq!(report.median_score, 0.0);
        assert!(report
            .score_distribution
            .values()
            .all(|bucket| bucket.count == 0 && bucket.percentage == 0.0));
    }

    #[test]
    fn test_analyze_distribution_checks_alignment() {
        let scorer = RougeLcpScorer::default();
        assert!(scorer.analyze_distribution(&["a"], &[]).is_err());

        let report = scorer
            .analyze_distribution(&["abc", "ab"], &["abc", "abcd"])
            .unwrap();
        assert_eq!(report.count(QualityBand::PerfectMatch), 1);
        assert_eq!(report.count(QualityBand::MediumQuality), 1);
    }

    #[test]
    fn test_bands_serialize_as_snake_case() {
        let report = DistributionReport::from_scores(&[1.0]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value["score_distribution"]["perfect_match"],
            json!({"count": 1, "percentage": 100.0})
        );
        assert!(value["score_distribution"].get("extensions").is_some());
    }
}
