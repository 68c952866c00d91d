use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::auth::{hash_password, verify_password};
use crate::db::{models::User, UserRepository};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: User,
}

/// Validate and sanitize username
fn validate_username(username: &str) -> Result<String, AppError> {
    let trimmed = username.trim();

    if trimmed.len() < 3 || trimmed.len() > 20 {
        return Err(AppError::Validation(
            "Username must be 3-20 characters".to_string(),
        ));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::Validation(
            "Username must be alphanumeric, underscore, or hyphen".to_string(),
        ));
    }

    // Convert to lowercase for consistency
    Ok(trimmed.to_lowercase())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 6 || password.len() > 100 {
        return Err(AppError::Validation(
            "Password must be 6-100 characters".to_string(),
        ));
    }

    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(AppError::Validation(
            "Password must contain at least one letter and one digit".to_string(),
        ));
    }

    Ok(())
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let username = validate_username(&req.username)?;
    validate_password(&req.password)?;

    // Pre-insert existence check; uniqueness is not enforced by the schema
    if UserRepository::get_by_username(&state.db, &username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    let (password_hash, salt) = hash_password(&req.password)?;

    let user = UserRepository::create(&state.db, username, &password_hash, &salt).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = req.username.trim().to_lowercase();

    // Same response for unknown username and wrong password
    let user = UserRepository::get_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = verify_password(&req.password, &user.password_hash, &user.password_salt)?;
    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let (token, expires_at) = state.keys.issue(
        &user.id,
        &user.username,
        chrono::Duration::hours(state.config.token_expiry_hours),
    )?;

    Ok(Json(LoginResponse {
        token,
        expires_at,
        user,
    }))
}
