//! Error handling for the candidate matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, MatcherError>;

/// Convert anyhow errors (raised while loading configuration) to our error type
impl From<anyhow::Error> for MatcherError {
    fn from(err: anyhow::Error) -> Self {
        MatcherError::Configuration(format!("{:#}", err))
    }
}

impl MatcherError {
    /// Whether the error came from an external provider (embedding model, LLM)
    /// and should be recovered locally rather than reported.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            MatcherError::ProviderUnavailable(_) | MatcherError::Embedding(_) | MatcherError::Network(_)
        )
    }
}
