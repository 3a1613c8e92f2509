//! User endpoints
//!
//! Registration, login, password reset and the user directory.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use super::dto::{LoginRequest, NewPasswordRequest, RegisterRequest};
use crate::AppState;
use crate::data::{User, UserView};
use crate::error::AppError;
use crate::service::UserService;

fn build_user_service(state: &AppState) -> UserService {
    UserService::new(state.db.clone())
}

fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    if req.username.trim().is_empty() {
        return Err(AppError::InvalidUsername);
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("password cannot be empty".to_string()));
    }
    Ok(())
}

/// POST /tweets/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserView>), AppError> {
    validate_registration(&req)?;

    let user = User {
        username: req.username,
        name: req.name,
        email: req.email,
        contact_number: req.contact_number,
        password: req.password,
    };
    let saved = build_user_service(&state).create_user(user).await?;

    Ok((StatusCode::CREATED, Json(UserView::directory(&saved))))
}

/// POST /tweets/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<UserView>, AppError> {
    let view = build_user_service(&state)
        .authenticate(&req.username, &req.password)
        .await?;
    Ok(Json(view))
}

/// PUT /tweets/:username/forgot
pub async fn change_password(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(req): Json<NewPasswordRequest>,
) -> Result<Json<UserView>, AppError> {
    tracing::debug!(%username, "changing password for user");
    let user = build_user_service(&state)
        .change_password(&username, &req.new_password, &req.contact)
        .await?;
    Ok(Json(UserView::profile(&user)))
}

/// GET /tweets/users/all
pub async fn get_all_users(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, AppError> {
    tracing::debug!("fetching total users");
    let users = build_user_service(&state).get_all_users().await?;
    Ok(Json(users))
}

/// GET /tweets/user/search/:username
pub async fn search_users(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<UserView>>, AppError> {
    tracing::debug!(%username, "searching users by username");
    let users = build_user_service(&state)
        .get_users_by_username(&username)
        .await?;
    Ok(Json(users.iter().map(UserView::profile).collect()))
}
