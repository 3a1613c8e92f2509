//! Tweet endpoints

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};

use super::dto::{ReplyRequest, TweetUpdateRequest};
use crate::AppState;
use crate::data::{Tweet, TweetDraft, TweetResponse};
use crate::error::AppError;
use crate::service::TweetService;

/// Header naming the user on whose behalf tweets are viewed
///
/// Clients send `loggedInUser`; header names arrive lowercased.
pub const LOGGED_IN_USER_HEADER: &str = "loggedinuser";

fn build_tweet_service(state: &AppState) -> TweetService {
    TweetService::new(state.db.clone())
}

fn extract_viewer(headers: &HeaderMap) -> Result<String, AppError> {
    let raw = headers.get(LOGGED_IN_USER_HEADER).ok_or_else(|| {
        AppError::Validation(format!("{LOGGED_IN_USER_HEADER} header is required"))
    })?;

    raw.to_str()
        .map(|value| value.trim().to_string())
        .map_err(|_| AppError::Validation(format!("{LOGGED_IN_USER_HEADER} must be ASCII")))
}

/// GET /tweets/all
pub async fn get_all_tweets(State(state): State<AppState>) -> Result<Json<Vec<Tweet>>, AppError> {
    tracing::debug!("getting all the tweets");
    let tweets = build_tweet_service(&state).get_all_tweets().await?;
    Ok(Json(tweets))
}

/// GET /tweets/:username
pub async fn get_user_tweets(
    State(state): State<AppState>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<TweetResponse>>, AppError> {
    let viewer = extract_viewer(&headers)?;
    tracing::debug!(%username, %viewer, "getting the tweets for user");
    let tweets = build_tweet_service(&state)
        .get_user_tweets(&username, &viewer)
        .await?;
    Ok(Json(tweets))
}

/// GET /tweets/:username/:tweet_id
///
/// The path username is the viewer for `likeStatus`.
pub async fn get_tweet(
    State(state): State<AppState>,
    Path((username, tweet_id)): Path<(String, String)>,
) -> Result<Json<TweetResponse>, AppError> {
    tracing::debug!(%username, %tweet_id, "getting the tweet details");
    let tweet = build_tweet_service(&state)
        .get_tweet(&tweet_id, &username)
        .await?;
    Ok(Json(tweet))
}

/// POST /tweets/:username/add
pub async fn post_tweet(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(draft): Json<TweetDraft>,
) -> Result<(StatusCode, Json<Tweet>), AppError> {
    if username.trim().is_empty() {
        return Err(AppError::InvalidUsername);
    }

    let tweet = build_tweet_service(&state)
        .post_new_tweet(&username, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(tweet)))
}

/// PUT /tweets/:username/update
pub async fn update_tweet(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(req): Json<TweetUpdateRequest>,
) -> Result<Json<Tweet>, AppError> {
    tracing::debug!(%username, tweet_id = %req.tweet_id, "updating the tweet");
    let tweet = build_tweet_service(&state)
        .update_tweet(&username, &req.tweet_id, &req.tweet_text)
        .await?;
    Ok(Json(tweet))
}

/// DELETE /tweets/:username/delete/:tweet_id
pub async fn delete_tweet(
    State(state): State<AppState>,
    Path((username, tweet_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    tracing::debug!(%username, %tweet_id, "deleting tweet");
    build_tweet_service(&state).delete_tweet(&tweet_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /tweets/:username/like/:tweet_id
pub async fn like_tweet(
    State(state): State<AppState>,
    Path((username, tweet_id)): Path<(String, String)>,
) -> Result<Json<Tweet>, AppError> {
    let tweet = build_tweet_service(&state)
        .like_tweet(&username, &tweet_id)
        .await?;
    Ok(Json(tweet))
}

/// POST /tweets/:username/dislike/:tweet_id
pub async fn dislike_tweet(
    State(state): State<AppState>,
    Path((username, tweet_id)): Path<(String, String)>,
) -> Result<Json<Tweet>, AppError> {
    let tweet = build_tweet_service(&state)
        .dislike_tweet(&username, &tweet_id)
        .await?;
    Ok(Json(tweet))
}

/// POST /tweets/:username/reply/:tweet_id
pub async fn reply_tweet(
    State(state): State<AppState>,
    Path((username, tweet_id)): Path<(String, String)>,
    Json(req): Json<ReplyRequest>,
) -> Result<Json<Tweet>, AppError> {
    let tweet = build_tweet_service(&state)
        .reply_tweet(&username, &tweet_id, &req.comment)
        .await?;
    Ok(Json(tweet))
}
