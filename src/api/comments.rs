use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::db::{models::Comment, CommentRepository, TicketRepository};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub ticket_id: String,
    pub content: String,
}

fn validate_content(content: &str) -> Result<String, AppError> {
    let trimmed = content.trim();

    if trimmed.is_empty() {
        return Err(AppError::Validation("Comment cannot be blank".to_string()));
    }
    if trimmed.chars().count() > 500 {
        return Err(AppError::Validation(
            "Comment must be at most 500 characters".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

/// GET /comments/ticket/:ticket_id
pub async fn list_comments(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> Result<Json<Vec<Comment>>, AppError> {
    if TicketRepository::get_by_id(&state.db, &ticket_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Ticket not found".to_string()));
    }

    let comments = CommentRepository::list_for_ticket(&state.db, &ticket_id).await?;

    Ok(Json(comments))
}

/// POST /comments
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let content = validate_content(&req.content)?;

    // Parent must exist at creation time; checked here, not by the schema
    if TicketRepository::get_by_id(&state.db, &req.ticket_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Ticket not found".to_string()));
    }

    let comment = CommentRepository::create(
        &state.db,
        req.ticket_id,
        user.id,
        user.username,
        content,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /comments/:id
/// Missing and not-owned collapse into one 404 so callers cannot probe for
/// other users' comment ids.
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let rows = CommentRepository::delete_by_author(&state.db, &id, &user.id).await?;
    if rows == 0 {
        return Err(AppError::NotFound("Comment not found".to_string()));
    }

    Ok(Json(serde_json::json!({"message": "Comment deleted"})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_must_not_be_blank() {
        assert!(validate_content("").is_err());
        assert!(validate_content("   ").is_err());
        assert!(validate_content("x").is_ok());
    }

    #[test]
    fn test_content_length_bound() {
        assert!(validate_content(&"c".repeat(500)).is_ok());
        assert!(validate_content(&"c".repeat(501)).is_err());
    }

    #[test]
    fn test_content_is_trimmed() {
        assert_eq!(validate_content("  hello  ").unwrap(), "hello");
    }
}
