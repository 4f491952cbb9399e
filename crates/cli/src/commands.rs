//! Command implementations behind the `lcpeval` binary

use anyhow::{Context, Result};
use lcpeval_core::config::Config;
use lcpeval_core::MetricKind;
use lcpeval_metrics::{
    load_evaluation_data, BatchEvaluator, EvaluationReport, EvaluationSource, RougeLcpScorer,
    TextNormalizer,
};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{info, warn};

/// Evaluates prediction/reference files and optionally writes the JSON report
pub fn evaluate_files(
    config: &Config,
    predictions: &Path,
    references: &Path,
    metrics: &[String],
    output: Option<&Path>,
) -> Result<EvaluationReport> {
    let evaluator = BatchEvaluator::new(config).context("Invalid evaluation configuration")?;
    let report = evaluator
        .calculate_all_metrics(
            EvaluationSource::Files {
                predictions,
                references,
            },
            metrics,
            output,
        )
        .context("Evaluation failed")?;

    for (kind, result) in report.results() {
        if result.is_degraded() {
            warn!("{kind} was not computed; its scores are reported as 0.0");
        }
        if !result.failures().is_empty() {
            warn!(
                "{kind}: {} pairs fell back to 0.0 after scoring errors",
                result.failures().len()
            );
        }
    }

    Ok(report)
}

/// Scores a single pair
pub fn score_pair(
    config: &Config,
    prediction: &str,
    reference: &str,
    metrics: &[String],
) -> Result<BTreeMap<MetricKind, f64>> {
    let evaluator = BatchEvaluator::new(config).context("Invalid evaluation configuration")?;
    evaluator
        .evaluate_one(prediction, reference, metrics)
        .context("Scoring failed")
}

/// ROUGE-LCP distribution report for prediction/reference files, as JSON
pub fn distribution_json(config: &Config, predictions: &Path, references: &Path) -> Result<String> {
    let (predictions, references) = load_evaluation_data(predictions, references)?;
    let predictions: Vec<&str> = predictions.iter().map(String::as_str).collect();
    let references: Vec<&str> = references.iter().map(String::as_str).collect();

    let scorer = RougeLcpScorer::new(TextNormalizer::from_config(&config.evaluation));
    let report = scorer.analyze_distribution(&predictions, &references)?;
    info!(
        "Analyzed ROUGE-LCP distribution over {} samples",
        report.total_samples
    );

    let json = if config.output.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    Ok(json)
}

/// Human-readable summary table for a report
pub fn format_summary(report: &EvaluationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Samples: {}", report.total_samples());
    let _ = writeln!(
        out,
        "{:<12} {:>12} {:>10} {:>10} {:>10}",
        "metric", "mean", "std_dev", "min", "max"
    );
    let _ = writeln!(out, "{}", "-".repeat(58));

    for kind in &report.summary().metrics_computed {
        let Some(result) = report.get(*kind) else {
            continue;
        };
        let marker = if result.is_degraded() {
            " (unavailable)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:<12} {:>12.4} {:>10.4} {:>10.4} {:>10.4}{marker}",
            kind.id(),
            result.aggregate_score(),
            result.std_dev(),
            result.min_score(),
            result.max_score(),
        );
    }
    out
}

/// One `metric: score` line per metric
pub fn format_scores(scores: &BTreeMap<MetricKind, f64>) -> String {
    let mut out = String::new();
    for (kind, score) in scores {
        let _ = writeln!(out, "{:<10} {score:.4}", kind.id());
    }
    out
}
