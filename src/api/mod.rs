pub mod auth;
pub mod comments;
pub mod middleware;
pub mod state;
pub mod tickets;

pub use middleware::AuthUser;
pub use state::AppState;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        // Ticket endpoints
        .route("/tickets", get(tickets::list_tickets).post(tickets::create_ticket))
        .route(
            "/tickets/:id",
            get(tickets::get_ticket)
                .put(tickets::update_ticket)
                .delete(tickets::delete_ticket),
        )
        // Comment endpoints
        .route("/comments/ticket/:ticket_id", get(comments::list_comments))
        .route("/comments", post(comments::create_comment))
        .route("/comments/:id", delete(comments::delete_comment))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        // Health check
        .route("/health", get(health))
        // Authentication endpoints
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
