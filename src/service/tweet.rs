//! Tweet service
//!
//! Handles tweet operations including create, update, delete,
//! like, dislike and reply. Reads are projected per viewer.
//!
//! Every mutation is a read-modify-write of the whole document with no
//! version check: concurrent writers to one tweet resolve as last write
//! wins. Mutations do not check that the caller authored the tweet.

use std::sync::Arc;

use crate::data::{Comment, Database, Repository, Tweet, TweetDraft, TweetId, TweetResponse};
use crate::error::AppError;
use crate::metrics::TWEETS_POSTED_TOTAL;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Tweet service
pub struct TweetService<R = Database> {
    repo: Arc<R>,
}

impl<R: Repository<Tweet>> TweetService<R> {
    /// Create new tweet service
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Load a tweet, treating a blank ID as absent without a store call
    async fn load(&self, tweet_id: &str, current_user: &str) -> Result<Tweet, AppError> {
        if !is_blank(tweet_id) {
            if let Some(tweet) = self.repo.get(tweet_id).await? {
                return Ok(tweet);
            }
        }

        tracing::error!(%tweet_id, %current_user, "Given tweetId cannot be found");
        Err(AppError::TweetNotFound)
    }

    /// Every stored tweet
    pub async fn get_all_tweets(&self) -> Result<Vec<Tweet>, AppError> {
        let tweets = self.repo.all().await?;
        tracing::debug!(total = tweets.len(), "found tweets");
        Ok(tweets)
    }

    /// Tweets authored by `username`, projected for `viewer`
    ///
    /// # Errors
    /// `InvalidUsername` if `username` is blank
    pub async fn get_user_tweets(
        &self,
        username: &str,
        viewer: &str,
    ) -> Result<Vec<TweetResponse>, AppError> {
        if is_blank(username) {
            tracing::error!(%username, "Username provided is invalid");
            return Err(AppError::InvalidUsername);
        }

        let tweets = self.repo.find_by_field("username", username).await?;
        tracing::debug!(%username, total = tweets.len(), "found tweets for user");

        Ok(tweets
            .iter()
            .map(|tweet| TweetResponse::for_viewer(tweet, viewer))
            .collect())
    }

    /// Post a new tweet as `username`
    ///
    /// # Returns
    /// The stored tweet with a fresh 10-character ID
    pub async fn post_new_tweet(
        &self,
        username: &str,
        draft: TweetDraft,
    ) -> Result<Tweet, AppError> {
        let tweet = Tweet {
            tweet_id: TweetId::new().0,
            username: username.to_string(),
            tweet_text: draft.tweet_text,
            display_name: draft.display_name,
            tweet_date: chrono::Utc::now(),
            likes: Vec::new(),
            comments: Vec::new(),
        };

        self.repo.insert(&tweet).await?;

        TWEETS_POSTED_TOTAL.inc();
        tracing::debug!(%username, tweet_id = %tweet.tweet_id, "posted new tweet");
        Ok(tweet)
    }

    /// One tweet projected for `viewer`
    ///
    /// # Errors
    /// `TweetNotFound` if absent
    pub async fn get_tweet(&self, tweet_id: &str, viewer: &str) -> Result<TweetResponse, AppError> {
        let tweet = self.load(tweet_id, viewer).await?;
        tracing::debug!(%tweet_id, %viewer, "found tweet");
        Ok(TweetResponse::for_viewer(&tweet, viewer))
    }

    /// Replace a tweet's text and reset its date
    ///
    /// `author` is only logged; it is not checked against the stored author.
    pub async fn update_tweet(
        &self,
        author: &str,
        tweet_id: &str,
        new_text: &str,
    ) -> Result<Tweet, AppError> {
        let mut tweet = self.load(tweet_id, author).await?;
        tweet.tweet_text = new_text.to_string();
        tweet.tweet_date = chrono::Utc::now();

        self.repo.put(&tweet).await?;
        tracing::debug!(%author, %tweet_id, "updated tweet");
        Ok(tweet)
    }

    /// Delete a tweet
    ///
    /// # Errors
    /// `TweetNotFound` if the ID is blank or absent
    pub async fn delete_tweet(&self, tweet_id: &str) -> Result<bool, AppError> {
        if is_blank(tweet_id) || !self.repo.exists(tweet_id).await? {
            tracing::error!(%tweet_id, "Given tweetId cannot be found");
            return Err(AppError::TweetNotFound);
        }

        // A concurrent delete may have removed it since the exists check.
        if !self.repo.delete(tweet_id).await? {
            return Err(AppError::TweetNotFound);
        }

        tracing::debug!(%tweet_id, "deleted tweet");
        Ok(true)
    }

    /// Add a like by `username`
    ///
    /// Likes are not deduplicated; liking twice stores two entries.
    pub async fn like_tweet(&self, username: &str, tweet_id: &str) -> Result<Tweet, AppError> {
        let mut tweet = self.load(tweet_id, username).await?;
        tweet.likes.push(username.to_string());

        self.repo.put(&tweet).await?;
        tracing::debug!(%username, %tweet_id, "liked tweet");
        Ok(tweet)
    }

    /// Remove one like by `username`
    ///
    /// Removing a like that isn't there is a no-op, though the document is
    /// still written back.
    pub async fn dislike_tweet(&self, username: &str, tweet_id: &str) -> Result<Tweet, AppError> {
        let mut tweet = self.load(tweet_id, username).await?;
        let removed = tweet.remove_like(username);

        self.repo.put(&tweet).await?;
        tracing::debug!(%username, %tweet_id, removed, "disliked tweet");
        Ok(tweet)
    }

    /// Append a reply by `username`
    pub async fn reply_tweet(
        &self,
        username: &str,
        tweet_id: &str,
        text: &str,
    ) -> Result<Tweet, AppError> {
        let mut tweet = self.load(tweet_id, username).await?;
        tweet.comments.push(Comment::new(username, text));

        self.repo.put(&tweet).await?;
        tracing::debug!(%username, %tweet_id, "replied to tweet");
        Ok(tweet)
    }
}
