//! Server binary: reads settings from env, picks the store, mounts all routes.

use simple_service::{
    app, build_state, ensure_database_exists, ensure_tables, seed_samples, MemorySimpleRepository,
    PgSimpleRepository, ServerConfig, SimpleRepository,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("simple_service=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let repo: Arc<dyn SimpleRepository> = match &config.database_url {
        Some(database_url) => {
            ensure_database_exists(database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await?;
            ensure_tables(&pool, &config.schema).await?;
            Arc::new(PgSimpleRepository::new(pool, &config.schema))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store");
            Arc::new(MemorySimpleRepository::new())
        }
    };

    let state = build_state(repo, &config);
    tracing::info!(
        cache = config.cache_enabled,
        metrics = config.metrics_enabled,
        "service ready"
    );
    if config.seed_samples {
        seed_samples(state.service.as_ref()).await?;
    }

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
