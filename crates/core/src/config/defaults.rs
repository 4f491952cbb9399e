//! Default values and functions for configuration

use crate::metric_id::MetricKind;

// Default constants
pub(crate) const DEFAULT_MAX_LCS_CELLS: usize = 16 * 1024 * 1024;
pub(crate) const DEFAULT_BLEU_MAX_ORDER: usize = 4;
pub(crate) const DEFAULT_BLEU_SMOOTHING_EPSILON: f64 = 0.1;

/// Upper bound accepted for `bleu.max_order`
pub(crate) const MAX_BLEU_ORDER: usize = 8;

pub(crate) fn default_metrics() -> Vec<String> {
    MetricKind::all()
        .into_iter()
        .map(|kind| kind.id().to_string())
        .collect()
}

pub(crate) fn default_trim_whitespace() -> bool {
    true
}

pub(crate) fn default_case_sensitive() -> bool {
    true
}

pub(crate) fn default_parallel() -> bool {
    false
}

pub(crate) fn default_max_lcs_cells() -> usize {
    DEFAULT_MAX_LCS_CELLS
}

pub(crate) fn default_bleu_max_order() -> usize {
    DEFAULT_BLEU_MAX_ORDER
}

pub(crate) fn default_bleu_smoothing_epsilon() -> f64 {
    DEFAULT_BLEU_SMOOTHING_EPSILON
}

pub(crate) fn default_bleu_enabled() -> bool {
    true
}

pub(crate) fn default_pretty_output() -> bool {
    true
}
