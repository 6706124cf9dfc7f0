use thiserror::Error;

/// Errors from the semantic layer.
///
/// None of these fail a review: callers fall back to the rule-only result
/// and mark the summary accordingly.
#[derive(Error, Debug)]
pub enum AiReviewError {
    #[error("no API key configured")]
    MissingCredentials,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("empty completion in API response")]
    EmptyResponse,

    #[error("response could not be parsed: {0}")]
    Unparseable(String),
}

impl AiReviewError {
    /// Transient failures worth one retry
    pub fn is_retryable(&self) -> bool {
        match self {
            AiReviewError::Http(err) => err.is_timeout() || err.is_connect(),
            AiReviewError::Status { code, .. } => *code == 429 || (500..=599).contains(code),
            _ => false,
        }
    }
}
