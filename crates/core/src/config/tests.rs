//! Tests for configuration module

use super::*;
use crate::error::{Error, Result};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn create_temp_config_file(content: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .map_err(|e| Error::config(format!("Failed to create temp file: {e}")))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::config(format!("Failed to write temp file: {e}")))?;
    file.flush()
        .map_err(|e| Error::config(format!("Failed to flush temp file: {e}")))?;
    Ok(file)
}

#[test]
fn test_from_toml_str_valid() {
    let toml = r#"
        [evaluation]
        metrics = ["lcp", "rouge_lcp"]
        case_sensitive = false

        [bleu]
        max_order = 2
    "#;

    let config = Config::from_toml_str(toml).expect("Failed to parse valid TOML");
    assert_eq!(config.evaluation.metrics, vec!["lcp", "rouge_lcp"]);
    assert!(!config.evaluation.case_sensitive);
    assert!(config.evaluation.trim_whitespace);
    assert_eq!(config.bleu.max_order, 2);
    assert_eq!(config.bleu.smoothing_epsilon, 0.1);
}

#[test]
fn test_from_toml_str_empty_uses_defaults() {
    let config = Config::from_toml_str("").expect("Failed to parse empty TOML");
    assert_eq!(
        config.evaluation.metrics,
        vec!["lcp", "rouge_lcp", "em", "bleu", "rouge_l"]
    );
    assert!(config.evaluation.case_sensitive);
    assert!(!config.evaluation.parallel);
    assert!(config.bleu.enabled);
    assert!(config.output.pretty);
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_toml_str_invalid() {
    let result = Config::from_toml_str("[evaluation\nmetrics = ");
    assert!(result.is_err());
}

#[test]
fn test_from_file_reads_sections() {
    let file = create_temp_config_file(
        r#"
        [evaluation]
        trim_whitespace = false
        max_lcs_cells = 1024

        [output]
        pretty = false
    "#,
    )
    .expect("Failed to create temp config");

    let config = Config::from_file(file.path()).expect("Failed to load config");
    assert!(!config.evaluation.trim_whitespace);
    assert_eq!(config.evaluation.max_lcs_cells, 1024);
    assert!(!config.output.pretty);
    assert_eq!(config.bleu.max_order, 4);
}

#[test]
fn test_from_file_missing_path_uses_defaults() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config =
        Config::from_file(&dir.path().join("absent.toml")).expect("Failed to load defaults");
    assert_eq!(config.evaluation.metrics.len(), 5);
    assert_eq!(config.evaluation.max_lcs_cells, 16 * 1024 * 1024);
}

#[test]
fn test_validate_rejects_unknown_metric() {
    let mut config = Config::default();
    config.evaluation.metrics = vec!["lcp".to_string(), "chrf".to_string()];
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("chrf"));
}

#[test]
fn test_validate_rejects_empty_metric_list() {
    let mut config = Config::default();
    config.evaluation.metrics.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_bleu_bounds() {
    let mut config = Config::default();

    config.bleu.max_order = 0;
    assert!(config.validate().is_err());

    config.bleu.max_order = 9;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("too large"));

    config.bleu.max_order = 4;
    config.bleu.smoothing_epsilon = 0.0;
    assert!(config.validate().is_err());

    config.bleu.smoothing_epsilon = f64::NAN;
    assert!(config.validate().is_err());

    config.bleu.smoothing_epsilon = 0.1;
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_zero_lcs_cells() {
    let mut config = Config::default();
    config.evaluation.max_lcs_cells = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_metric_kinds_preserves_order() {
    let mut config = Config::default();
    config.evaluation.metrics = vec!["bleu".to_string(), "lcp".to_string()];
    let kinds = config.evaluation.metric_kinds().expect("valid metrics");
    assert_eq!(kinds, vec![MetricKind::Bleu, MetricKind::Lcp]);
}
