use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::middleware::{ensure_owner, AuthUser};
use crate::api::state::AppState;
use crate::db::{
    models::{Ticket, TicketStatus},
    SortBy, SortOrder, TicketRepository,
};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTicketsQuery {
    pub search: Option<String>,
    pub status: Option<TicketStatus>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
}

fn validate_title(title: &str) -> Result<String, AppError> {
    let trimmed = title.trim();

    let length = trimmed.chars().count();
    if length < 3 || length > 100 {
        return Err(AppError::Validation(
            "Title must be 3-100 characters".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

fn validate_description(description: &str) -> Result<(), AppError> {
    if description.chars().count() > 1000 {
        return Err(AppError::Validation(
            "Description must be at most 1000 characters".to_string(),
        ));
    }
    Ok(())
}

/// POST /tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    let title = validate_title(&req.title)?;
    if let Some(ref description) = req.description {
        validate_description(description)?;
    }
    let status = req.status.unwrap_or(TicketStatus::Open);

    let ticket =
        TicketRepository::create(&state.db, user.id, title, req.description, status).await?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    Query(query): Query<ListTicketsQuery>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    let tickets = TicketRepository::list(
        &state.db,
        query.search.as_deref(),
        query.status,
        query.sort_by.unwrap_or_default(),
        query.sort_order.unwrap_or_default(),
    )
    .await?;

    Ok(Json(tickets))
}

/// GET /tickets/:id
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = TicketRepository::get_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(ticket))
}

/// PUT /tickets/:id
pub async fn update_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTicketRequest>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = TicketRepository::get_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;
    ensure_owner(&ticket.owner_id, &user)?;

    let title = req.title.as_deref().map(validate_title).transpose()?;
    if let Some(ref description) = req.description {
        validate_description(description)?;
    }

    let updated = TicketRepository::update(&state.db, &id, title, req.description, req.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(updated))
}

/// DELETE /tickets/:id
pub async fn delete_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ticket = TicketRepository::get_by_id(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;
    ensure_owner(&ticket.owner_id, &user)?;

    TicketRepository::delete(&state.db, &id).await?;

    Ok(Json(serde_json::json!({"message": "Ticket deleted"})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_length_bounds() {
        assert!(validate_title("ab").is_err());
        assert!(validate_title("abc").is_ok());
        assert!(validate_title(&"a".repeat(100)).is_ok());
        assert!(validate_title(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_title_trimmed_before_checking() {
        assert_eq!(validate_title("  Fix login bug  ").unwrap(), "Fix login bug");
        assert!(validate_title("  ab  ").is_err());
    }

    #[test]
    fn test_description_length_bound() {
        assert!(validate_description(&"d".repeat(1000)).is_ok());
        assert!(validate_description(&"d".repeat(1001)).is_err());
    }
}
