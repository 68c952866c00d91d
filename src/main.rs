use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticket_tracker::{
    api::{create_router, AppState},
    auth::TokenKeys,
    config::Config,
    error::AppError,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ticket_tracker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting ticket tracker server v{}...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Arc::new(Config::from_env()?);
    tracing::info!("✅ Configuration loaded");

    // Setup database with proper connection pooling
    let db = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await?;

    tracing::info!("✅ Database connected: {}", config.database_url);

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;

    tracing::info!("✅ Database migrations completed");

    // Token signing keys from the configured secret
    let keys = Arc::new(TokenKeys::new(config.token_secret.as_bytes()));
    tracing::info!("✅ Token keys initialized (expiry: {}h)", config.token_expiry_hours);

    // Create shared application state
    let state = AppState {
        db,
        keys,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Bind and serve
    let addr = config.server_address();
    tracing::info!("🌐 Server listening on http://{}", addr);
    tracing::info!("🏥 Health check: http://{}/health", addr);
    tracing::info!("");
    tracing::info!("📚 API Endpoints:");
    tracing::info!("  POST   /auth/register              - Register new user");
    tracing::info!("  POST   /auth/login                 - Login, returns bearer token");
    tracing::info!("  GET    /tickets                    - List tickets (requires auth)");
    tracing::info!("  POST   /tickets                    - Create ticket (requires auth)");
    tracing::info!("  GET    /tickets/:id                - Get ticket (requires auth)");
    tracing::info!("  PUT    /tickets/:id                - Update ticket (owner only)");
    tracing::info!("  DELETE /tickets/:id                - Delete ticket (owner only)");
    tracing::info!("  GET    /comments/ticket/:ticketId  - List comments (requires auth)");
    tracing::info!("  POST   /comments                   - Create comment (requires auth)");
    tracing::info!("  DELETE /comments/:id               - Delete comment (author only)");
    tracing::info!("");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
