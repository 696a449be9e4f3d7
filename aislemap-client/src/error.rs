use aislemap_core::{DateError, SubmissionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("CSRF token required for {0}")]
    MissingCsrfToken(&'static str),

    #[error("Date error: {0}")]
    Date(#[from] DateError),

    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),
}
