//! Core types for the lcpeval completion-metric toolkit
//!
//! This crate provides the foundational pieces shared by the metric engine
//! and the command line front end:
//!
//! - **Metric identifiers**: the closed set of metrics the evaluator accepts
//! - **Configuration**: evaluation, BLEU and output settings
//! - **Error handling**: unified error types
//!

pub mod config;
pub mod error;
pub mod metric_id;

// Re-export main types for convenience
pub use config::{BleuConfig, Config, EvaluationConfig, OutputConfig};
pub use error::{Error, Result, ResultExt};
pub use metric_id::MetricKind;

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Result, ResultExt};
    pub use crate::metric_id::MetricKind;
}
