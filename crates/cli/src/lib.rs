//! lcpeval CLI library
//!
//! Exposes the command implementations so integration tests can drive them
//! without spawning the binary.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod commands;

pub use commands::{distribution_json, evaluate_files, format_scores, format_summary, score_pair};
