mod admin;
mod attendance;
mod auth;
mod db;
mod error;
mod leave;
mod middleware;
mod notification;
mod routes;
mod state;
mod user;
mod websocket;

use anyhow::Context;
use db::{create_pool, run_migrations};
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hr_notify=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    tracing::info!("Connecting to database...");
    let db = create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("failed to connect to database")?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await.context("failed to run migrations")?;

    let state = AppState::new(db, config.clone());

    if let Some(email) = config.admin_email.as_deref() {
        if state.user_repository.promote_to_admin(email).await? {
            tracing::info!(%email, "bootstrap admin account is in place");
        } else {
            tracing::info!(%email, "bootstrap admin will be granted on registration");
        }
    }

    let app = create_router(state);

    let addr = config.bind_address();
    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
