use async_trait::async_trait;
use thiserror::Error;

use crate::pipeline::identity::IdentityProfile;

/// A fetched document plus the transport facts the content check needs.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub body: String,
    pub status: u16,
    pub bytes: usize,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("browser error: {0}")]
    Browser(String),
    /// Every identity produced a document that failed the content check.
    #[error("source served no recognizable listing document")]
    Blocked,
}

impl FetchError {
    /// Whether another attempt with the same identity is worthwhile.
    /// Transport failures and throttling/server statuses are retried;
    /// other client errors are final.
    pub fn retryable(&self) -> bool {
        match self {
            FetchError::Transport(_) | FetchError::Browser(_) => true,
            FetchError::Status(status) => matches!(status, 429 | 500 | 502 | 503 | 504),
            FetchError::Blocked => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

/// Common contract for document retrieval. Implemented by the plain
/// HTTP client and by the headless browser, so the rest of the pipeline
/// does not care how a source gets rendered.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str, identity: &IdentityProfile) -> Result<RawDocument, FetchError>;
}
