use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("resolver could not produce a direct media URL: {0}")]
    ResolveFailed(String),

    #[error("invalid resource URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server responded with status {status}")]
    FetchFailed { status: reqwest::StatusCode },

    #[error("transfer interrupted mid-stream: {0}")]
    StreamInterrupted(#[source] reqwest::Error),

    #[error("payload finalized before the stream terminated")]
    PrematureFinalize,

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("failed to persist payload: {0}")]
    MaterializeFailed(#[source] std::io::Error),
}
