//! Secondary metrics reported alongside LCP and ROUGE-LCP for comparison

mod bleu;
mod exact_match;
mod rouge_l;

pub use bleu::{BleuScorer, NgramBackend, SmoothedBleu};
pub use exact_match::ExactMatchScorer;
pub use rouge_l::{lcs_length, RougeLScorer};
