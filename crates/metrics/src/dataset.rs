//! Loading predictions and references from JSON documents
//!
//! Three document shapes are accepted:
//! - a list of plain values: `["a", "b"]`
//! - a list of records: `[{"prediction": "a"}, ...]`
//! - a mapping: `{"id1": "a", "id2": "b"}` (values taken in document order)
//!
//! Any other top-level value is treated as a single item.

use lcpeval_core::error::{Result, ResultExt};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Record key holding a prediction
pub const PREDICTION_FIELD: &str = "prediction";
/// Record key holding a reference
pub const REFERENCE_FIELD: &str = "reference";

/// Textual form of an arbitrary JSON value
///
/// Strings are taken verbatim, `null` becomes the empty string and anything
/// else is rendered as compact JSON.
///
/// JSON spelling is kept for scalars: `true` stays `true` and `3.5` stays
/// `3.5`, with no language-specific capitalisation such as `True` or `None`.
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Extracts one text per item; `field` selects the payload of record items
pub fn texts_from_value(value: &Value, field: &str) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(record) => record.get(field).map(coerce_text).unwrap_or_default(),
                other => coerce_text(other),
            })
            .collect(),
        Value::Object(mapping) => mapping.values().map(coerce_text).collect(),
        other => vec![coerce_text(other)],
    }
}

/// Reads a JSON document and extracts its texts
pub fn load_texts(path: &Path, field: &str) -> Result<Vec<String>> {
    let content =
        std::fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .context(format!("Failed to parse JSON in {}", path.display()))?;
    let texts = texts_from_value(&value, field);
    debug!("Loaded {} items from {}", texts.len(), path.display());
    Ok(texts)
}

/// Loads predictions and references from their respective files
pub fn load_evaluation_data(
    predictions_path: &Path,
    references_path: &Path,
) -> Result<(Vec<String>, Vec<String>)> {
    let predictions = load_texts(predictions_path, PREDICTION_FIELD)?;
    let references = load_texts(references_path, REFERENCE_FIELD)?;
    Ok((predictions, references))
}
