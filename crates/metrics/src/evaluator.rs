//! Batch evaluation across several metrics

use lcpeval_core::config::Config;
use lcpeval_core::error::{Error, Result};
use lcpeval_core::MetricKind;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::auxiliary::{BleuScorer, ExactMatchScorer, RougeLScorer};
use crate::dataset::load_evaluation_data;
use crate::lcp::LcpScorer;
use crate::normalize::TextNormalizer;
use crate::report::EvaluationReport;
use crate::rouge_lcp::RougeLcpScorer;
use crate::scorer::{ensure_aligned, Scorer};

/// Where [`BatchEvaluator::calculate_all_metrics`] takes its inputs from
#[derive(Debug, Clone)]
pub enum EvaluationSource<'a> {
    /// JSON documents on disk
    Files {
        predictions: &'a Path,
        references: &'a Path,
    },
    /// Already loaded sequences
    InMemory {
        predictions: Vec<String>,
        references: Vec<String>,
    },
}

/// Runs every requested scorer over aligned predictions and references
pub struct BatchEvaluator {
    scorers: BTreeMap<MetricKind, Arc<dyn Scorer>>,
    default_metrics: Vec<MetricKind>,
    parallel: bool,
    pretty_output: bool,
}

impl BatchEvaluator {
    /// Builds the standard scorer set from configuration
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let default_metrics = config.evaluation.metric_kinds()?;
        Ok(Self::build(config, default_metrics))
    }

    /// Evaluator with default settings
    pub fn with_defaults() -> Self {
        Self::build(&Config::default(), MetricKind::all())
    }

    fn build(config: &Config, default_metrics: Vec<MetricKind>) -> Self {
        let normalizer = TextNormalizer::from_config(&config.evaluation);

        let scorers: Vec<Arc<dyn Scorer>> = vec![
            Arc::new(LcpScorer::new(normalizer)),
            Arc::new(RougeLcpScorer::new(normalizer)),
            Arc::new(ExactMatchScorer::new(normalizer)),
            Arc::new(BleuScorer::from_config(normalizer, &config.bleu)),
            Arc::new(RougeLScorer::new(
                normalizer,
                config.evaluation.max_lcs_cells,
            )),
        ];

        Self {
            scorers: scorers
                .into_iter()
                .map(|scorer| (scorer.kind(), scorer))
                .collect(),
            default_metrics,
            parallel: config.evaluation.parallel,
            pretty_output: config.output.pretty,
        }
    }

    /// Replaces the scorer registered for `scorer.kind()`
    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorers.insert(scorer.kind(), scorer);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn scorer(&self, kind: MetricKind) -> Option<&Arc<dyn Scorer>> {
        self.scorers.get(&kind)
    }

    /// Metrics computed when a request names none
    pub fn default_metrics(&self) -> &[MetricKind] {
        &self.default_metrics
    }

    /// Resolves metric identifiers; an empty request selects the defaults
    pub fn resolve_metrics<M: AsRef<str>>(&self, metrics: &[M]) -> Result<Vec<MetricKind>> {
        if metrics.is_empty() {
            return Ok(self.default_metrics.clone());
        }
        MetricKind::parse_all(metrics)
    }

    /// Evaluates every requested metric over the aligned inputs.
    ///
    /// Unknown metric identifiers and misaligned inputs are rejected before any
    /// pair is scored.
    pub fn evaluate<P, R, M>(
        &self,
        predictions: &[P],
        references: &[R],
        metrics: &[M],
    ) -> Result<EvaluationReport>
    where
        P: AsRef<str>,
        R: AsRef<str>,
        M: AsRef<str>,
    {
        let kinds = self.resolve_metrics(metrics)?;
        self.evaluate_kinds(predictions, references, &kinds)
    }

    pub fn evaluate_kinds<P, R>(
        &self,
        predictions: &[P],
        references: &[R],
        kinds: &[MetricKind],
    ) -> Result<EvaluationReport>
    where
        P: AsRef<str>,
        R: AsRef<str>,
    {
        ensure_aligned(predictions.len(), references.len())?;

        let mut selected: Vec<(MetricKind, &Arc<dyn Scorer>)> = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let scorer = self
                .scorers
                .get(kind)
                .ok_or_else(|| Error::unsupported_metric(kind.id()))?;
            if !selected.iter().any(|(k, _)| k == kind) {
                selected.push((*kind, scorer));
            }
        }

        let predictions: Vec<&str> = predictions.iter().map(AsRef::as_ref).collect();
        let references: Vec<&str> = references.iter().map(AsRef::as_ref).collect();

        info!(
            "Evaluating {} samples across {} metrics",
            predictions.len(),
            selected.len()
        );

        let mut results = Vec::with_capacity(selected.len());
        for (kind, scorer) in selected {
            let result = scorer.compute_batch(&predictions, &references, self.parallel)?;
            debug!(
                metric = %kind,
                aggregate = result.aggregate_score(),
                failures = result.failures().len(),
                "Metric computed"
            );
            results.push((kind, result));
        }

        Ok(EvaluationReport::new(predictions.len(), results))
    }

    /// Scores a single pair; identical to a batch of one
    pub fn evaluate_one<M: AsRef<str>>(
        &self,
        prediction: &str,
        reference: &str,
        metrics: &[M],
    ) -> Result<BTreeMap<MetricKind, f64>> {
        let report = self.evaluate(&[prediction], &[reference], metrics)?;
        Ok(report
            .results()
            .iter()
            .map(|(kind, result)| (*kind, result.scores().first().copied().unwrap_or(0.0)))
            .collect())
    }

    /// Loads inputs, evaluates them and optionally writes the report to `output`
    pub fn calculate_all_metrics<M: AsRef<str>>(
        &self,
        source: EvaluationSource<'_>,
        metrics: &[M],
        output: Option<&Path>,
    ) -> Result<EvaluationReport> {
        let (predictions, references) = match source {
            EvaluationSource::Files {
                predictions,
                references,
            } => load_evaluation_data(predictions, references)?,
            EvaluationSource::InMemory {
                predictions,
                references,
            } => (predictions, references),
        };

        let report = self.evaluate(&predictions, &references, metrics)?;
        if let Some(path) = output {
            report.write_json(path, self.pretty_output)?;
        }
        Ok(report)
    }
}

impl Default for BatchEvaluator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_metrics_defaults_when_empty() {
        let evaluator = BatchEvaluator::with_defaults();
        let none: [&str; 0] = [];
        assert_eq!(evaluator.resolve_metrics(&none).unwrap(), MetricKind::all());
    }

    #[test]
    fn test_with_defaults_matches_default_config() {
        let from_config = BatchEvaluator::new(&Config::default()).unwrap();
        let default_evaluator = BatchEvaluator::with_defaults();
        assert_eq!(
            default_evaluator.default_metrics(),
            from_config.default_metrics()
        );
        assert_eq!(default_evaluator.parallel, from_config.parallel);
        assert_eq!(default_evaluator.pretty_output, from_config.pretty_output);

        let predictions = ["def f(x):", "RETURN x", ""];
        let references = ["def f(x): pass", "return x", "x"];
        let none: [&str; 0] = [];
        let expected = from_config
            .evaluate(&predictions, &references, &none)
            .unwrap();
        let actual = default_evaluator
            .evaluate(&predictions, &references, &none)
            .unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_new_uses_configured_defaults() {
        let mut config = Config::default();
        config.evaluation.metrics = vec!["em".to_string()];
        let evaluator = BatchEvaluator::new(&config).unwrap();
        assert_eq!(evaluator.default_metrics(), &[MetricKind::ExactMatch]);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = Config::default();
        config.bleu.max_order = 0;
        assert!(BatchEvaluator::new(&config).is_err());
    }

    #[test]
    fn test_every_metric_has_a_scorer() {
        let evaluator = BatchEvaluator::new(&Config::default()).unwrap();
        for kind in MetricKind::all() {
            assert_eq!(evaluator.scorer(kind).map(|s| s.kind()), Some(kind));
        }
    }

    #[test]
    fn test_duplicate_kinds_are_computed_once() {
        let evaluator = BatchEvaluator::with_defaults();
        let report = evaluator
            .evaluate_kinds(&["a"], &["a"], &[MetricKind::Lcp, MetricKind::Lcp])
            .unwrap();
        assert_eq!(report.summary().metrics_computed, vec![MetricKind::Lcp]);
    }
}
