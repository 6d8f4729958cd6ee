use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;

use wellspring_api::config::{Config, StorageBackend};
use wellspring_api::store::{MemoryStore, PgStore, Store};
use wellspring_api::{build_router, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wellspring_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = db::pool::create_pool(url)
                .await
                .context("Failed to create database pool")?;
            let store = PgStore::new(pool);
            store.migrate().await.context("Failed to run database migrations")?;
            Arc::new(store)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let addr = config.listen_addr();
    let state = AppState::new(store, config);
    state.rate_limiter.spawn_cleanup_worker();

    let app = build_router(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
