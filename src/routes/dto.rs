use serde::Deserialize;

use crate::models::CreatePaste;

/// `POST /api/v1/pastes` request body (§6.1).
#[derive(Debug, Deserialize)]
pub struct CreateReq {
    pub content: String,
    #[serde(default)]
    pub syntax_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<String>,
    #[serde(default)]
    pub is_private: Option<bool>,
}

impl CreateReq {
    pub fn into_create_paste(self) -> CreatePaste {
        CreatePaste {
            content: self.content,
            syntax_type: self.syntax_type,
            expires_in: self.expires_in,
            is_private: self.is_private.unwrap_or(false),
            user_id: None,
        }
    }
}
