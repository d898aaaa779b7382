use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("No comments to analyze")]
    NoComments,

    #[error("All {0} comments failed classification")]
    AllClassificationsFailed(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Errors the retry wrapper treats as transient for a single comment.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::LLMApi(_) | Error::ParseError(_) | Error::Network(_) | Error::Serialization(_)
        )
    }
}
