use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing configuration: {0}")]
    ConfigurationMissing(String),

    #[error("Quote unavailable: {0}")]
    QuoteUnavailable(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Arithmetic hazard: {0}")]
    ArithmeticHazard(String),

    #[error("Failed to generate article: {0}")]
    GenerationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Re-labels any non-generation fault as a generation failure, keeping
    /// its message as the cause.
    pub fn into_generation_failure(self) -> Self {
        match self {
            Error::GenerationFailed(_) => self,
            other => Error::GenerationFailed(other.to_string()),
        }
    }

    /// Same as [`Error::into_generation_failure`] for the quote side.
    pub fn into_quote_failure(self) -> Self {
        match self {
            Error::QuoteUnavailable(_) => self,
            other => Error::QuoteUnavailable(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
