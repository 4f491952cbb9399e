//! Evaluation report document

use lcpeval_core::error::{Result, ResultExt};
use lcpeval_core::MetricKind;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::results::MetricResultSet;

/// Top-level summary of an evaluation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_samples: usize,
    /// Metrics in the order they were requested
    pub metrics_computed: Vec<MetricKind>,
    /// Metric -> mean score
    pub summary_scores: BTreeMap<MetricKind, f64>,
}

/// One [`MetricResultSet`] per requested metric plus a summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    summary: ReportSummary,
    detailed_results: BTreeMap<MetricKind, MetricResultSet>,
}

impl EvaluationReport {
    pub fn new(total_samples: usize, results: Vec<(MetricKind, MetricResultSet)>) -> Self {
        let metrics_computed = results.iter().map(|(kind, _)| *kind).collect();
        let summary_scores = results
            .iter()
            .map(|(kind, result)| (*kind, result.aggregate_score()))
            .collect();
        let detailed_results = results.into_iter().collect();

        Self {
            summary: ReportSummary {
                total_samples,
                metrics_computed,
                summary_scores,
            },
            detailed_results,
        }
    }

    pub fn summary(&self) -> &ReportSummary {
        &self.summary
    }

    pub fn total_samples(&self) -> usize {
        self.summary.total_samples
    }

    pub fn get(&self, kind: MetricKind) -> Option<&MetricResultSet> {
        self.detailed_results.get(&kind)
    }

    pub fn results(&self) -> &BTreeMap<MetricKind, MetricResultSet> {
        &self.detailed_results
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Writes the report as JSON, creating parent directories as needed
    pub fn write_json(&self, path: &Path, pretty: bool) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory {}", parent.display()))?;
        }
        std::fs::write(path, self.to_json_string(pretty)?)
            .context(format!("Failed to write report to {}", path.display()))?;
        info!("Saved evaluation report to {}", path.display());
        Ok(())
    }
}
