//! # Kanflow API Server
//!
//! The kanflow board manager: boards, members, and tasks moving through
//! status columns, served over a JSON API.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (`.env` supported)
//! 2. Create the database pool and run pending migrations
//! 3. Build the router and serve until ctrl-c
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p kanflow-api
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kanflow_api::{
    app::{build_router, AppState},
    config::Config,
};
use kanflow_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kanflow_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Kanflow API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received, exiting...");
        })
        .await?;

    Ok(())
}
