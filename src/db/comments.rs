use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::db::models::Comment;
use crate::error::AppError;

pub struct CommentRepository;

impl CommentRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        ticket_id: String,
        author_id: String,
        author_username: String,
        content: String,
    ) -> Result<Comment, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        let comment = sqlx::query_as::<_, Comment>(
            r#"
INSERT INTO comments (id, ticket_id, author_id, author_username, content, created_at)
VALUES (?, ?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&ticket_id)
        .bind(&author_id)
        .bind(&author_username)
        .bind(&content)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    pub async fn list_for_ticket(
        pool: &Pool<Sqlite>,
        ticket_id: &str,
    ) -> Result<Vec<Comment>, AppError> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
SELECT * FROM comments
WHERE ticket_id = ?
ORDER BY created_at ASC
            "#,
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Author-scoped delete: a missing comment and someone else's comment
    /// both affect zero rows, so the caller cannot tell them apart.
    pub async fn delete_by_author(
        pool: &Pool<Sqlite>,
        id: &str,
        author_id: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ? AND author_id = ?")
            .bind(id)
            .bind(author_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_list_is_chronological() {
        let pool = test_pool().await;

        for content in ["first", "second", "third"] {
            CommentRepository::create(
                &pool,
                "ticket-1".to_string(),
                "user-1".to_string(),
                "alice".to_string(),
                content.to_string(),
            )
            .await
            .unwrap();
        }

        let comments = CommentRepository::list_for_ticket(&pool, "ticket-1")
            .await
            .unwrap();

        let contents: Vec<_> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_delete_is_author_scoped() {
        let pool = test_pool().await;

        let comment = CommentRepository::create(
            &pool,
            "ticket-1".to_string(),
            "user-1".to_string(),
            "alice".to_string(),
            "mine".to_string(),
        )
        .await
        .unwrap();

        // Someone else's delete affects nothing
        let rows = CommentRepository::delete_by_author(&pool, &comment.id, "user-2")
            .await
            .unwrap();
        assert_eq!(rows, 0);

        let rows = CommentRepository::delete_by_author(&pool, &comment.id, "user-1")
            .await
            .unwrap();
        assert_eq!(rows, 1);

        let remaining = CommentRepository::list_for_ticket(&pool, "ticket-1")
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }
}
