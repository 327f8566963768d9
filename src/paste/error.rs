use thiserror::Error;

/// The error taxonomy for the paste orchestrator (§7), independent of wire mapping.
#[derive(Debug, Error)]
pub enum PasteError {
    #[error("content must not be empty")]
    EmptyContent,

    #[error("content exceeds the maximum allowed size")]
    ContentTooLarge,

    #[error("syntax type is not in the supported whitelist")]
    InvalidSyntaxType,

    #[error("expires_in could not be parsed")]
    InvalidExpiresIn,

    #[error("no such paste")]
    NotFound,

    #[error("paste has expired")]
    Expired,

    #[error("key pool exhausted, try again shortly")]
    NoKeysAvailable,

    #[error("short_id collision on insert, invariant breach")]
    Duplicate,

    #[error("downstream I/O error: {0}")]
    Transient(String),
}

pub type PasteResult<T> = Result<T, PasteError>;

impl From<crate::kgs::KgsError> for PasteError {
    fn from(e: crate::kgs::KgsError) -> Self {
        match e {
            crate::kgs::KgsError::NoKeysAvailable => PasteError::NoKeysAvailable,
            crate::kgs::KgsError::Db(e) => PasteError::Transient(e.to_string()),
        }
    }
}

impl From<crate::store::BlobError> for PasteError {
    fn from(e: crate::store::BlobError) -> Self {
        match e {
            crate::store::BlobError::ContentNotFound(_) => PasteError::NotFound,
            other => PasteError::Transient(other.to_string()),
        }
    }
}

impl From<crate::db::DbError> for PasteError {
    fn from(e: crate::db::DbError) -> Self {
        match e {
            crate::db::DbError::Conflict(_) => PasteError::Duplicate,
            crate::db::DbError::NotConfigured => {
                PasteError::Transient("metadata index not configured".to_string())
            }
            other => PasteError::Transient(other.to_string()),
        }
    }
}

impl From<crate::cache::CacheError> for PasteError {
    fn from(e: crate::cache::CacheError) -> Self {
        PasteError::Transient(e.to_string())
    }
}
