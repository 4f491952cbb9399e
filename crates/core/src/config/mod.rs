//! Configuration module for lcpeval
//!
//! Configuration can be loaded from TOML files and/or environment variables.
//! Every field has a default, so an empty document is a valid configuration.

mod defaults;
mod loading;

#[cfg(test)]
mod tests;

use crate::error::{Error, Result};
use crate::metric_id::MetricKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.lcpeval/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".lcpeval").join("config.toml"))
}

/// Evaluation configuration shared by every metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Metric identifiers computed when the caller does not name any
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,

    /// Strip leading/trailing whitespace after single-line truncation
    #[serde(default = "default_trim_whitespace")]
    pub trim_whitespace: bool,

    /// Compare characters case-sensitively
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,

    /// Score pairs on the rayon thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Largest |prediction| * |reference| the ROUGE-L table may cover
    #[serde(default = "default_max_lcs_cells")]
    pub max_lcs_cells: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            metrics: default_metrics(),
            trim_whitespace: default_trim_whitespace(),
            case_sensitive: default_case_sensitive(),
            parallel: default_parallel(),
            max_lcs_cells: default_max_lcs_cells(),
        }
    }
}

impl EvaluationConfig {
    /// Parsed form of [`EvaluationConfig::metrics`]
    pub fn metric_kinds(&self) -> Result<Vec<MetricKind>> {
        MetricKind::parse_all(&self.metrics)
    }
}

/// Configuration for the BLEU scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BleuConfig {
    /// Highest n-gram order (uniform weights 1/max_order)
    #[serde(default = "default_bleu_max_order")]
    pub max_order: usize,

    /// Numerator added to zero-match precisions
    #[serde(default = "default_bleu_smoothing_epsilon")]
    pub smoothing_epsilon: f64,

    /// When false the n-gram backend is treated as unavailable
    #[serde(default = "default_bleu_enabled")]
    pub enabled: bool,
}

impl Default for BleuConfig {
    fn default() -> Self {
        Self {
            max_order: default_bleu_max_order(),
            smoothing_epsilon: default_bleu_smoothing_epsilon(),
            enabled: default_bleu_enabled(),
        }
    }
}

/// Configuration for report output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON reports
    #[serde(default = "default_pretty_output")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty_output(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Evaluation configuration
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// BLEU configuration
    #[serde(default)]
    pub bleu: BleuConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.evaluation.metrics.is_empty() {
            return Err(Error::config(
                "evaluation.metrics must name at least one metric".to_string(),
            ));
        }
        self.evaluation.metric_kinds()?;

        if self.evaluation.max_lcs_cells == 0 {
            return Err(Error::config(
                "evaluation.max_lcs_cells must be greater than 0".to_string(),
            ));
        }

        if self.bleu.max_order == 0 {
            return Err(Error::config(
                "bleu.max_order must be greater than 0".to_string(),
            ));
        }
        if self.bleu.max_order > MAX_BLEU_ORDER {
            return Err(Error::config(format!(
                "bleu.max_order too large (max {MAX_BLEU_ORDER}, got {})",
                self.bleu.max_order
            )));
        }

        let epsilon = self.bleu.smoothing_epsilon;
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(Error::config(format!(
                "bleu.smoothing_epsilon must be a positive finite number, got {epsilon}"
            )));
        }

        Ok(())
    }
}
