#[derive(Debug, thiserror::Error)]
pub enum RingshelfError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The external store rejected or failed an operation. The message is
    /// passed through to the caller largely verbatim.
    #[error("Store error: {0}")]
    Store(String),

    /// A multi-write unit (position swap, deck replace, cascade delete)
    /// committed some writes but not all, and compensation also failed.
    #[error("Partially applied: {0}")]
    PartiallyApplied(String),

    /// Import text contained zero recognizable card lines.
    #[error("no card lines found")]
    EmptyImport,
}

pub type Result<T> = std::result::Result<T, RingshelfError>;
