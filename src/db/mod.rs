pub mod comments;
pub mod models;
pub mod tickets;
pub mod users;

pub use comments::CommentRepository;
pub use models::{Comment, Ticket, TicketStatus, User};
pub use tickets::{SortBy, SortOrder, TicketRepository};
pub use users::UserRepository;

#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::Pool<sqlx::Sqlite> {
    // A single connection keeps every statement on the same in-memory database
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    pool
}
