mod app;
mod config;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod ports;
mod routes;
mod services;
mod state;
mod store;

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::config::{AppConfig, StorageBackend};
use crate::external::simulated::SimulatedPriceProvider;
use crate::logging::LoggingConfig;
use crate::ports::outbound::PortfolioStore;
use crate::services::portfolio_service::{PortfolioService, PortfolioSettings};
use crate::state::AppState;
use crate::store::{MemoryStore, PgPortfolioStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env()?;

    let store: Arc<dyn PortfolioStore> = match config.storage {
        StorageBackend::Postgres => {
            let database_url = config.database_url.as_deref().unwrap_or_default();
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(database_url)
                .await
                .context("failed to connect to DATABASE_URL")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("failed to run migrations")?;
            tracing::info!("Using PostgreSQL storage");
            Arc::new(PgPortfolioStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    tracing::info!("Simulating prices with ±{}% jitter", config.price_jitter_percent);
    let service = PortfolioService::new(
        store,
        Arc::new(SimulatedPriceProvider::new(config.price_jitter_percent)),
        PortfolioSettings {
            portfolio_id: config.portfolio_id,
            logo_url_template: config.logo_url_template.clone(),
        },
    );
    let state = AppState {
        portfolio_service: Arc::new(service),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(config.bind_addr).await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("Portfolio tracker backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app)
        .await?;

    Ok(())
}
