//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;
use tracing::debug;

use super::defaults::*;
use super::{global_config_path, Config};

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `LCPEVAL_` and use double underscores
    /// for nested values. For example:
    /// - `LCPEVAL_EVALUATION__CASE_SENSITIVE=false`
    /// - `LCPEVAL_EVALUATION__METRICS=lcp,rouge_lcp`
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // Evaluation defaults
        let builder = set_config_default(builder, "evaluation.metrics", default_metrics())?;
        let builder = set_config_default(
            builder,
            "evaluation.trim_whitespace",
            default_trim_whitespace(),
        )?;
        let builder = set_config_default(
            builder,
            "evaluation.case_sensitive",
            default_case_sensitive(),
        )?;
        let builder = set_config_default(builder, "evaluation.parallel", default_parallel())?;
        let builder = set_config_default(
            builder,
            "evaluation.max_lcs_cells",
            default_max_lcs_cells() as i64,
        )?;

        // BLEU defaults
        let builder =
            set_config_default(builder, "bleu.max_order", default_bleu_max_order() as i64)?;
        let builder = set_config_default(
            builder,
            "bleu.smoothing_epsilon",
            default_bleu_smoothing_epsilon(),
        )?;
        let builder = set_config_default(builder, "bleu.enabled", default_bleu_enabled())?;

        // Output defaults
        let mut builder = set_config_default(builder, "output.pretty", default_pretty_output())?;

        // Add the config file if it exists
        if path.exists() {
            debug!("Reading configuration from {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        // Add environment variables with LCPEVAL_ prefix
        builder = builder.add_source(
            Environment::with_prefix("LCPEVAL")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("evaluation.metrics")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.lcpeval/config.toml or custom --config path)
    /// 3. Environment variables (LCPEVAL_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
