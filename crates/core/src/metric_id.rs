//! Metric identifiers recognised by the evaluator

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::error::{Error, Result};

/// Closed set of metrics the batch evaluator knows how to compute
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum MetricKind {
    /// Longest common prefix length
    #[serde(rename = "lcp")]
    #[strum(serialize = "lcp")]
    Lcp,
    /// LCP divided by normalized reference length
    #[serde(rename = "rouge_lcp")]
    #[strum(serialize = "rouge_lcp")]
    RougeLcp,
    /// Exact match of normalized strings
    #[serde(rename = "em")]
    #[strum(serialize = "em")]
    ExactMatch,
    /// Character-level smoothed BLEU
    #[serde(rename = "bleu")]
    #[strum(serialize = "bleu")]
    Bleu,
    /// LCS-based ROUGE-L F1
    #[serde(rename = "rouge_l")]
    #[strum(serialize = "rouge_l")]
    RougeL,
}

impl MetricKind {
    /// Every supported metric, in canonical order
    pub fn all() -> Vec<MetricKind> {
        MetricKind::iter().collect()
    }

    /// Identifier string used in configuration files and reports
    pub fn id(&self) -> &'static str {
        (*self).into()
    }

    /// Comma separated list of supported identifiers, for error messages
    pub fn supported_list() -> String {
        MetricKind::iter()
            .map(|kind| kind.id())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parses an identifier, failing with [`Error::UnsupportedMetric`]
    pub fn parse(name: &str) -> Result<Self> {
        MetricKind::from_str(name.trim()).map_err(|_| Error::unsupported_metric(name))
    }

    /// Parses a list of identifiers, dropping duplicates while keeping first-seen order.
    ///
    /// Fails on the first unknown identifier so callers never start a partial run.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Self>> {
        let mut kinds = Vec::with_capacity(names.len());
        for name in names {
            let kind = Self::parse(name.as_ref())?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_round_trip_through_display() {
        for kind in MetricKind::all() {
            assert_eq!(kind.to_string(), kind.id());
            assert_eq!(MetricKind::parse(kind.id()).ok(), Some(kind));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_identifier() {
        let err = MetricKind::parse("meteor").unwrap_err();
        match err {
            Error::UnsupportedMetric { name, .. } => assert_eq!(name, "meteor"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_all_dedupes_in_order() {
        let kinds = MetricKind::parse_all(&["em", "lcp", "em"]).unwrap();
        assert_eq!(kinds, vec![MetricKind::ExactMatch, MetricKind::Lcp]);
    }

    #[test]
    fn test_parse_all_fails_fast() {
        assert!(MetricKind::parse_all(&["lcp", "nope", "em"]).is_err());
    }

    #[test]
    fn test_serde_uses_identifiers() {
        let json = serde_json::to_string(&MetricKind::RougeLcp).unwrap();
        assert_eq!(json, "\"rouge_lcp\"");
    }

    #[test]
    fn test_ids_match_serialized_names() {
        let ids: Vec<&str> = MetricKind::all().iter().map(|kind| kind.id()).collect();
        assert_eq!(ids, vec!["lcp", "rouge_lcp", "em", "bleu", "rouge_l"]);
        for kind in MetricKind::all() {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.id()));
        }
    }
}
