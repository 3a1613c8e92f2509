//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Each service receives its repository at construction.

mod tweet;
mod user;

pub use tweet::TweetService;
pub use user::UserService;
