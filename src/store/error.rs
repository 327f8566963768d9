use thiserror::Error;

/// Errors from the compressed blob store adapter (§4.3).
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("content not found: {0}")]
    ContentNotFound(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "s3-storage")]
    #[error("S3 error: {0}")]
    S3(String),

    #[error("transient storage error: {0}")]
    Transient(String),
}

pub type BlobResult<T> = Result<T, BlobError>;
