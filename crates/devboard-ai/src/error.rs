use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("no chat API key configured")]
    MissingApiKey,
    #[error("chat API request failed: {0}")]
    RequestFailed(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
