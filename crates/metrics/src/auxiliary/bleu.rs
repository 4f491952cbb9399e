use lcpeval_core::config::BleuConfig;
use lcpeval_core::MetricKind;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::normalize::TextNormalizer;
use crate::results::MetricResultSet;
use crate::scorer::{ScoreError, Scorer};

/// Sentence-level n-gram scorer the BLEU metric delegates to
pub trait NgramBackend: Send + Sync {
    /// BLEU of `hypothesis` against a single `reference`, in [0, 1]
    fn sentence_bleu(&self, reference: &[char], hypothesis: &[char]) -> Result<f64, ScoreError>;

    /// Highest n-gram order used
    fn max_order(&self) -> usize;
}

/// Count n-grams of one order
fn ngram_counts(tokens: &[char], n: usize) -> HashMap<&[char], usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= n {
        for window in tokens.windows(n) {
            *counts.entry(window).or_insert(0) += 1;
        }
    }
    counts
}

/// Clipped matches and total n-grams of the hypothesis for one order.
/// The total is floored at 1 so short hypotheses still yield a precision.
fn modified_precision(reference: &[char], hypothesis: &[char], n: usize) -> (usize, usize) {
    let hypothesis_counts = ngram_counts(hypothesis, n);
    let reference_counts = ngram_counts(reference, n);

    let clipped = hypothesis_counts
        .iter()
        .map(|(ngram, count)| {
            let available = reference_counts.get(ngram).copied().unwrap_or(0);
            (*count).min(available)
        })
        .sum();
    let total: usize = hypothesis_counts.values().sum();

    (clipped, total.max(1))
}

fn brevity_penalty(reference_len: usize, hypothesis_len: usize) -> f64 {
    if hypothesis_len > reference_len {
        1.0
    } else if hypothesis_len == 0 {
        0.0
    } else {
        (1.0 - reference_len as f64 / hypothesis_len as f64).exp()
    }
}

/// BLEU with uniform weights and additive smoothing of zero-match precisions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedBleu {
    max_order: usize,
    epsilon: f64,
}

impl SmoothedBleu {
    pub fn new(max_order: usize, epsilon: f64) -> Self {
        Self { max_order, epsilon }
    }
}

impl Default for SmoothedBleu {
    fn default() -> Self {
        Self::new(4, 0.1)
    }
}

impl NgramBackend for SmoothedBleu {
    fn sentence_bleu(&self, reference: &[char], hypothesis: &[char]) -> Result<f64, ScoreError> {
        if self.max_order == 0 {
            return Err(ScoreError::computation("BLEU max_order must be positive"));
        }

        let precisions: Vec<(usize, usize)> = (1..=self.max_order)
            .map(|n| modified_precision(reference, hypothesis, n))
            .collect();

        // No unigram overlap at all
        if precisions[0].0 == 0 {
            return Ok(0.0);
        }

        let weight = 1.0 / self.max_order as f64;
        let log_sum: f64 = precisions
            .iter()
            .map(|&(matches, total)| {
                let precision = if matches == 0 {
                    self.epsilon / total as f64
                } else {
                    matches as f64 / total as f64
                };
                weight * precision.ln()
            })
            .sum();

        let penalty = brevity_penalty(reference.len(), hypothesis.len());
        Ok(penalty * log_sum.exp())
    }

    fn max_order(&self) -> usize {
        self.max_order
    }
}

#[derive(Clone)]
enum Backend {
    Available(Arc<dyn NgramBackend>),
    Unavailable(String),
}

/// Character-level BLEU, scaled to 0-100
#[derive(Clone)]
pub struct BleuScorer {
    normalizer: TextNormalizer,
    backend: Backend,
}

impl fmt::Debug for BleuScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backend = match &self.backend {
            Backend::Available(backend) => format!("available(max_order={})", backend.max_order()),
            Backend::Unavailable(reason) => format!("unavailable({reason})"),
        };
        f.debug_struct("BleuScorer")
            .field("normalizer", &self.normalizer)
            .field("backend", &backend)
            .finish()
    }
}

impl Default for BleuScorer {
    fn default() -> Self {
        Self::new(TextNormalizer::default(), Arc::new(SmoothedBleu::default()))
    }
}

impl BleuScorer {
    pub fn new(normalizer: TextNormalizer, backend: Arc<dyn NgramBackend>) -> Self {
        Self {
            normalizer,
            backend: Backend::Available(backend),
        }
    }

    /// A scorer whose backend cannot be used; every pair reports degraded
    pub fn unavailable(normalizer: TextNormalizer, reason: impl Into<String>) -> Self {
        Self {
            normalizer,
            backend: Backend::Unavailable(reason.into()),
        }
    }

    pub fn from_config(normalizer: TextNormalizer, config: &BleuConfig) -> Self {
        if config.enabled {
            Self::new(
                normalizer,
                Arc::new(SmoothedBleu::new(
                    config.max_order,
                    config.smoothing_epsilon,
                )),
            )
        } else {
            Self::unavailable(normalizer, "BLEU backend disabled by configuration")
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.backend, Backend::Available(_))
    }
}

impl Scorer for BleuScorer {
    fn kind(&self) -> MetricKind {
        MetricKind::Bleu
    }

    fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    fn compute(&self, prediction: &str, reference: &str) -> Result<f64, ScoreError> {
        let backend = match &self.backend {
            Backend::Available(backend) => backend,
            Backend::Unavailable(reason) => {
                return Err(ScoreError::unavailable(MetricKind::Bleu, reason.clone()));
            }
        };

        let prediction = self.normalizer.normalize(prediction).to_chars();
        let reference = self.normalizer.normalize(reference).to_chars();
        if prediction.is_empty() || reference.is_empty() {
            return Ok(0.0);
        }

        Ok(backend.sentence_bleu(&reference, &prediction)? * 100.0)
    }

    fn annotate(&self, _predictions: &[&str], _references: &[&str], results: &mut MetricResultSet) {
        if let Backend::Available(backend) = &self.backend {
            results.add_metadata("max_order", backend.max_order());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_identical_long_strings_score_hundred() {
        let scorer = BleuScorer::default();
        let score = scorer
            .compute("let value = 42;", "let value = 42;")
            .unwrap();
        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_identical_string_is_smoothed() {
        // 4-gram precision is 0/1 and smoothed to 0.1
        let bleu = SmoothedBleu::default();
        let score = bleu.sentence_bleu(&chars("abc"), &chars("abc")).unwrap();
        assert!((score - 0.1f64.powf(0.25)).abs() < 1e-12);
    }

    #[test]
    fn test_no_unigram_overlap_scores_zero() {
        let bleu = SmoothedBleu::default();
        assert_eq!(
            bleu.sentence_bleu(&chars("abcd"), &chars("wxyz")).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_brevity_penalty_for_short_hypothesis() {
        assert_eq!(brevity_penalty(4, 8), 1.0);
        assert_eq!(brevity_penalty(4, 4), 1.0);
        assert_eq!(brevity_penalty(4, 0), 0.0);
        assert!((brevity_penalty(8, 4) - (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_prefix_prediction_is_penalised() {
        let scorer = BleuScorer::default();
        let full = scorer
            .compute("for i in range(10):", "for i in range(10):")
            .unwrap();
        let prefix = scorer.compute("for i in", "for i in range(10):").unwrap();
        assert!(prefix < full);
        assert!(prefix > 0.0);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        let scorer = BleuScorer::default();
        assert_eq!(scorer.compute("", "abc").unwrap(), 0.0);
        assert_eq!(scorer.compute("abc", "").unwrap(), 0.0);
    }

    #[test]
    fn test_unavailable_backend_degrades_batch() {
        let scorer = BleuScorer::unavailable(TextNormalizer::default(), "no backend");
        assert!(!scorer.is_available());
        assert!(matches!(
            scorer.compute("a", "a"),
            Err(ScoreError::Unavailable { .. })
        ));

        let results = scorer
            .compute_batch(&["abcd", "efgh"], &["abcd", "efgh"], false)
            .unwrap();
        assert_eq!(results.scores(), &[0.0, 0.0]);
        assert!(results.is_degraded());
        assert_eq!(
            results.metadata_value("degraded_reason"),
            Some(&serde_json::json!("no backend"))
        );
        assert!(results.failures().is_empty());
    }

    #[test]
    fn test_disabled_config_is_unavailable() {
        let config = BleuConfig {
            enabled: false,
            ..BleuConfig::default()
        };
        let scorer = BleuScorer::from_config(TextNormalizer::default(), &config);
        assert!(!scorer.is_available());
    }

    #[test]
    fn test_batch_reports_max_order() {
        let config = BleuConfig {
            max_order: 2,
            ..BleuConfig::default()
        };
        let scorer = BleuScorer::from_config(TextNormalizer::default(), &config);
        let results = scorer.compute_batch(&["ab"], &["ab"], false).unwrap();
        assert_eq!(
            results.metadata_value("max_order"),
            Some(&serde_json::json!(2))
        );
        assert!((results.scores()[0] - 100.0).abs() < 1e-9);
    }
}
