//! Code completion metrics aligned with how users accept suggestions
//!
//! This crate provides:
//! - Text normalization shared by every metric (single-line, optional trim and case folding)
//! - LCP and ROUGE-LCP prefix metrics
//! - Exact match, ROUGE-L and BLEU for comparison
//! - Batch evaluation with per-pair fault recovery and summary statistics
//! - JSON dataset loading and report writing

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod auxiliary;
pub mod dataset;
pub mod evaluator;
pub mod lcp;
pub mod normalize;
pub mod report;
pub mod results;
pub mod rouge_lcp;
pub mod scorer;

pub use auxiliary::{BleuScorer, ExactMatchScorer, NgramBackend, RougeLScorer, SmoothedBleu};
pub use dataset::{load_evaluation_data, load_texts};
pub use evaluator::{BatchEvaluator, EvaluationSource};
pub use lcp::{longest_common_prefix, LcpScorer, PrefixCoverage};
pub use normalize::{normalize, NormalizedText, TextNormalizer};
pub use report::{EvaluationReport, ReportSummary};
pub use results::{MetricResultSet, ScoreFailure, ScoreStats};
pub use rouge_lcp::{DistributionReport, QualityBand, RougeLcpScorer};
pub use scorer::{ScoreError, Scorer};
