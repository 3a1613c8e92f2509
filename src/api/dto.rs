//! Request bodies
//!
//! Response bodies are the projections in `crate::data`.

use serde::Deserialize;

/// Registration body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    #[serde(alias = "contactNum")]
    pub contact_number: String,
    pub password: String,
}

/// Login body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// PUT /tweets/:username/forgot
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordRequest {
    pub new_password: String,
    pub contact: String,
}

/// PUT /tweets/:username/update
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetUpdateRequest {
    pub tweet_id: String,
    pub tweet_text: String,
}

/// POST /tweets/:username/reply/:tweet_id
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub comment: String,
}
