use thiserror::Error;

/// Failures of the remote value fetch. Every variant is absorbed by the
/// refresher - the gesture path never sees them.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
