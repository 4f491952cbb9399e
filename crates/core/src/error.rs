use thiserror::Error;

/// Result type for lcpeval operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for lcpeval operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON encoding or decoding errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Predictions and references are not aligned
    #[error(
        "Number of predictions ({predictions}) must match number of references ({references})"
    )]
    ShapeMismatch {
        predictions: usize,
        references: usize,
    },

    /// Metric identifier outside the supported set
    #[error("Unsupported metric '{name}'. Supported metrics: {supported}")]
    UnsupportedMetric { name: String, supported: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a shape mismatch error from the two input lengths
    pub fn shape_mismatch(predictions: usize, references: usize) -> Self {
        Self::ShapeMismatch {
            predictions,
            references,
        }
    }

    /// Creates an unsupported metric error listing the accepted identifiers
    pub fn unsupported_metric(name: impl Into<String>) -> Self {
        Self::UnsupportedMetric {
            name: name.into(),
            supported: crate::metric_id::MetricKind::supported_list(),
        }
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}
