//! Shared domain types for the paste lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authoritative metadata record for a paste, as stored in the metadata index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasteRecord {
    pub short_id: String,
    pub content_key: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub burn_after_read: bool,
    pub syntax_type: String,
    pub is_private: bool,
    pub user_id: Option<String>,
}

impl PasteRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Input to create a paste. Mirrors `CreateReq` at the HTTP boundary.
#[derive(Debug, Clone)]
pub struct CreatePaste {
    pub content: String,
    pub syntax_type: Option<String>,
    pub expires_in: Option<String>,
    pub is_private: bool,
    pub user_id: Option<String>,
}

/// Result of a successful create, mirrors `CreateResp`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedPaste {
    pub short_id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of a successful read, mirrors `GetResp`.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedPaste {
    pub short_id: String,
    pub content: String,
    pub syntax_type: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// A KGS candidate key row.
#[derive(Debug, Clone)]
pub struct KgsKey {
    pub key: String,
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}
