use serde::Deserialize;
use sqlx::{Pool, QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::db::models::{Ticket, TicketStatus};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    CreatedAt,
    Title,
}

impl Default for SortBy {
    fn default() -> Self {
        SortBy::CreatedAt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}

pub struct TicketRepository;

impl TicketRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        owner_id: String,
        title: String,
        description: Option<String>,
        status: TicketStatus,
    ) -> Result<Ticket, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
INSERT INTO tickets (id, title, description, status, owner_id, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&title)
        .bind(&description)
        .bind(status)
        .bind(&owner_id)
        .bind(created_at)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        Ok(ticket)
    }

    pub async fn get_by_id(
        pool: &Pool<Sqlite>,
        id: &str,
    ) -> Result<Option<Ticket>, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(ticket)
    }

    /// Filtered, sorted listing. The search term matches the title as a
    /// case-insensitive substring; a term that parses as a uuid also
    /// matches the id exactly.
    pub async fn list(
        pool: &Pool<Sqlite>,
        search: Option<&str>,
        status: Option<TicketStatus>,
        sort_by: SortBy,
        sort_order: SortOrder,
    ) -> Result<Vec<Ticket>, AppError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM tickets");

        if let Some(term) = search {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            qb.push(" WHERE (LOWER(title) LIKE ");
            qb.push_bind(pattern);
            qb.push(" ESCAPE '\\'");
            if Uuid::parse_str(term).is_ok() {
                qb.push(" OR id = ");
                qb.push_bind(term.to_string());
            }
            qb.push(")");
        }

        if let Some(status) = status {
            qb.push(if search.is_some() { " AND " } else { " WHERE " });
            qb.push("status = ");
            qb.push_bind(status);
        }

        let column = match sort_by {
            SortBy::CreatedAt => "created_at",
            SortBy::Title => "title COLLATE NOCASE",
        };
        let direction = match sort_order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        qb.push(format!(" ORDER BY {} {}", column, direction));

        let tickets = qb.build_query_as::<Ticket>().fetch_all(pool).await?;

        Ok(tickets)
    }

    /// Partial field replace; absent fields keep their stored value.
    pub async fn update(
        pool: &Pool<Sqlite>,
        id: &str,
        title: Option<String>,
        description: Option<String>,
        status: Option<TicketStatus>,
    ) -> Result<Option<Ticket>, AppError> {
        let updated_at = chrono::Utc::now().timestamp();

        let ticket = sqlx::query_as::<_, Ticket>(
            r#"
UPDATE tickets
SET title = COALESCE(?, title),
    description = COALESCE(?, description),
    status = COALESCE(?, status),
    updated_at = ?
WHERE id = ?
RETURNING *
            "#,
        )
        .bind(&title)
        .bind(&description)
        .bind(status)
        .bind(updated_at)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(ticket)
    }

    pub async fn delete(pool: &Pool<Sqlite>, id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn seed(pool: &Pool<Sqlite>) -> Vec<Ticket> {
        let mut tickets = Vec::new();
        for (title, status) in [
            ("Fix login bug", TicketStatus::Open),
            ("Update docs", TicketStatus::InProgress),
            ("BUG in search", TicketStatus::Closed),
        ] {
            tickets.push(
                TicketRepository::create(
                    pool,
                    "owner-1".to_string(),
                    title.to_string(),
                    None,
                    status,
                )
                .await
                .unwrap(),
            );
        }
        tickets
    }

    #[tokio::test]
    async fn test_search_matches_title_case_insensitively() {
        let pool = test_pool().await;
        seed(&pool).await;

        let found = TicketRepository::list(
            &pool,
            Some("bug"),
            None,
            SortBy::default(),
            SortOrder::default(),
        )
        .await
        .unwrap();

        let titles: Vec<_> = found.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(found.len(), 2);
        assert!(titles.contains(&"Fix login bug"));
        assert!(titles.contains(&"BUG in search"));
    }

    #[tokio::test]
    async fn test_search_by_id_shape_matches_exact_id() {
        let pool = test_pool().await;
        let seeded = seed(&pool).await;

        let found = TicketRepository::list(
            &pool,
            Some(&seeded[0].id),
            None,
            SortBy::default(),
            SortOrder::default(),
        )
        .await
        .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, seeded[0].id);
    }

    #[tokio::test]
    async fn test_status_filter_intersects_search() {
        let pool = test_pool().await;
        seed(&pool).await;

        let found = TicketRepository::list(
            &pool,
            Some("bug"),
            Some(TicketStatus::Closed),
            SortBy::default(),
            SortOrder::default(),
        )
        .await
        .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "BUG in search");
    }

    #[tokio::test]
    async fn test_sort_by_title_ascending() {
        let pool = test_pool().await;
        seed(&pool).await;

        let found =
            TicketRepository::list(&pool, None, None, SortBy::Title, SortOrder::Asc)
                .await
                .unwrap();

        let titles: Vec<_> = found.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["BUG in search", "Fix login bug", "Update docs"]);
    }

    #[tokio::test]
    async fn test_like_wildcards_are_literal() {
        let pool = test_pool().await;
        seed(&pool).await;

        let found = TicketRepository::list(
            &pool,
            Some("%"),
            None,
            SortBy::default(),
            SortOrder::default(),
        )
        .await
        .unwrap();

        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_absent_fields() {
        let pool = test_pool().await;
        let ticket = TicketRepository::create(
            &pool,
            "owner-1".to_string(),
            "Original title".to_string(),
            Some("A description".to_string()),
            TicketStatus::Open,
        )
        .await
        .unwrap();

        let updated = TicketRepository::update(
            &pool,
            &ticket.id,
            None,
            None,
            Some(TicketStatus::Closed),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.title, "Original title");
        assert_eq!(updated.description.as_deref(), Some("A description"));
        assert_eq!(updated.status, TicketStatus::Closed);
    }

    #[tokio::test]
    async fn test_delete_reports_rows() {
        let pool = test_pool().await;
        let seeded = seed(&pool).await;

        assert_eq!(TicketRepository::delete(&pool, &seeded[0].id).await.unwrap(), 1);
        assert_eq!(TicketRepository::delete(&pool, &seeded[0].id).await.unwrap(), 0);
        assert!(TicketRepository::get_by_id(&pool, &seeded[0].id)
            .await
            .unwrap()
            .is_none());
    }
}
