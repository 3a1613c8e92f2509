//! Data models
//!
//! Persisted documents and the read-only projections built from them.
//! Field names are camelCase on the wire and in the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Length of a generated tweet ID
pub const TWEET_ID_LEN: usize = 10;

/// Value shown in place of a password in every projection
pub const SCRUBBED_PASSWORD: &str = "********";

// =============================================================================
// ID Types
// =============================================================================

/// Tweet ID (opaque, 10 characters)
///
/// Example: "3f2a9c1be0"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TweetId(pub String);

impl TweetId {
    /// Generate a new ID from the first characters of a random v4 UUID
    ///
    /// Collisions are possible and surface as an insert conflict.
    pub fn new() -> Self {
        let mut raw = uuid::Uuid::new_v4().simple().to_string();
        raw.truncate(TWEET_ID_LEN);
        Self(raw)
    }
}

impl Default for TweetId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered user
///
/// `username` is the document key and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub name: String,
    pub email: String,
    #[serde(alias = "contactNum")]
    pub contact_number: String,
    /// Stored as given at registration
    pub password: String,
}

/// Public view of a user with the password scrubbed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub username: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    pub password: String,
}

impl UserView {
    /// Profile view: username, name and email only
    pub fn profile(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            contact_number: None,
            password: SCRUBBED_PASSWORD.to_string(),
        }
    }

    /// Directory view: profile plus contact number
    pub fn directory(user: &User) -> Self {
        Self {
            contact_number: Some(user.contact_number.clone()),
            ..Self::profile(user)
        }
    }
}

// =============================================================================
// Tweet
// =============================================================================

/// A reply attached to a tweet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
}

impl Comment {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }
}

/// A tweet document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub tweet_id: String,
    /// Author, always set by the service
    pub username: String,
    pub tweet_text: String,
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
    /// Creation time, reset on every text update
    pub tweet_date: DateTime<Utc>,
    /// Usernames that liked this tweet; duplicates are kept
    #[serde(default)]
    pub likes: Vec<String>,
    /// Replies in insertion order
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Tweet {
    /// Whether `viewer` appears in `likes`
    pub fn is_liked_by(&self, viewer: &str) -> bool {
        self.likes.iter().any(|like| like == viewer)
    }

    /// Remove the first like by `username`, if any
    ///
    /// Returns whether an entry was removed.
    pub fn remove_like(&mut self, username: &str) -> bool {
        match self.likes.iter().position(|like| like == username) {
            Some(index) => {
                self.likes.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Client-supplied content for a new tweet
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetDraft {
    pub tweet_text: String,
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
}

/// Read-only tweet projection relative to a viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetResponse {
    pub tweet_id: String,
    pub username: String,
    pub tweet_text: String,
    pub display_name: Option<String>,
    pub tweet_date: DateTime<Utc>,
    pub likes_count: usize,
    pub comments_count: usize,
    pub like_status: bool,
    pub comments: Vec<Comment>,
}

impl TweetResponse {
    /// Project a stored tweet for `viewer`
    pub fn for_viewer(tweet: &Tweet, viewer: &str) -> Self {
        Self {
            tweet_id: tweet.tweet_id.clone(),
            username: tweet.username.clone(),
            tweet_text: tweet.tweet_text.clone(),
            display_name: tweet.display_name.clone(),
            tweet_date: tweet.tweet_date,
            likes_count: tweet.likes.len(),
            comments_count: tweet.comments.len(),
            like_status: tweet.is_liked_by(viewer),
            comments: tweet.comments.clone(),
        }
    }
}
