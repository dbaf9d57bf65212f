use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ngo_scholarship_api::cli::Cli;
use ngo_scholarship_api::database::{DatabaseManager, MemoryStore, PgStore, Store};
use ngo_scholarship_api::{app, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ngo_scholarship_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("invalid configuration")?;
    cli.apply(&mut config);
    tracing::info!("Starting NGO Scholarship API in {:?} mode", config.environment);

    let store: Arc<dyn Store> = if cli.in_memory || config.database.url.is_none() {
        if !cli.in_memory {
            tracing::warn!("DATABASE_URL is not set; serving from the in-memory store");
        }
        Arc::new(MemoryStore::seeded())
    } else {
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        Arc::new(PgStore::new(pool))
    };

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, store).context("failed to build application state")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
