//! API layer
//!
//! HTTP handlers for:
//! - User registration, login and directory
//! - Tweet CRUD, likes and replies
//! - Metrics (Prometheus)

mod dto;
pub mod metrics;
mod tweets;
mod users;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::AppState;

pub use dto::*;
pub use metrics::{metrics_router, track_http_metrics};
pub use tweets::LOGGED_IN_USER_HEADER;

/// Create the `/tweets` router
///
/// Static segments (`all`, `register`, `users/all`, ...) take priority over
/// the `:username` captures.
pub fn tweets_router() -> Router<AppState> {
    Router::new()
        // Users
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/users/all", get(users::get_all_users))
        .route("/user/search/:username", get(users::search_users))
        .route("/:username/forgot", put(users::change_password))
        // Tweets
        .route("/all", get(tweets::get_all_tweets))
        .route("/:username", get(tweets::get_user_tweets))
        .route("/:username/add", post(tweets::post_tweet))
        .route("/:username/update", put(tweets::update_tweet))
        .route("/:username/:tweet_id", get(tweets::get_tweet))
        .route("/:username/delete/:tweet_id", delete(tweets::delete_tweet))
        .route("/:username/like/:tweet_id", post(tweets::like_tweet))
        .route("/:username/dislike/:tweet_id", post(tweets::dislike_tweet))
        .route("/:username/reply/:tweet_id", post(tweets::reply_tweet))
}
