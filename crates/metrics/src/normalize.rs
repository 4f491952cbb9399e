//! Text preprocessing shared by every metric
//!
//! All metrics compare the same canonical form of their inputs: carriage
//! returns removed, leading blank lines dropped, only the first remaining line
//! kept, then optionally trimmed and lower-cased.

use lcpeval_core::config::EvaluationConfig;
use std::fmt;

/// Canonical single-line form of a prediction or reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedText {
    text: String,
    char_len: usize,
}

impl NormalizedText {
    fn new(text: String) -> Self {
        let char_len = text.chars().count();
        Self { text, char_len }
    }

    /// The normalized text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in Unicode scalar values
    pub fn len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// Characters as an indexable sequence
    pub fn to_chars(&self) -> Vec<char> {
        self.text.chars().collect()
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Normalizer settings applied identically to predictions and references
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextNormalizer {
    trim_whitespace: bool,
    case_sensitive: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self {
            trim_whitespace: true,
            case_sensitive: true,
        }
    }
}

impl TextNormalizer {
    pub fn new(trim_whitespace: bool, case_sensitive: bool) -> Self {
        Self {
            trim_whitespace,
            case_sensitive,
        }
    }

    pub fn from_config(config: &EvaluationConfig) -> Self {
        Self::new(config.trim_whitespace, config.case_sensitive)
    }

    pub fn trim_whitespace(&self) -> bool {
        self.trim_whitespace
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Canonicalize `text` into its comparable single-line form
    pub fn normalize(&self, text: &str) -> NormalizedText {
        let without_cr = text.replace('\r', "");
        let first_line = without_cr
            .trim_start_matches('\n')
            .split('\n')
            .next()
            .unwrap_or_default();

        let line = if self.trim_whitespace {
            first_line.trim()
        } else {
            first_line
        };

        let text = if self.case_sensitive {
            line.to_string()
        } else {
            line.to_lowercase()
        };

        NormalizedText::new(text)
    }

    /// Normalized length in characters
    pub fn normalized_len(&self, text: &str) -> usize {
        self.normalize(text).len()
    }
}

/// Free-function form of [`TextNormalizer::normalize`]
pub fn normalize(text: &str, trim_whitespace: bool, case_sensitive: bool) -> NormalizedText {
    TextNormalizer::new(trim_whitespace, case_sensitive).normalize(text)
}
