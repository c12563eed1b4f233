pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use logic::{FlightRoster, FlightTracker, TrackerError, TrackerResult};

// Export all model types
pub use model::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};

use std::sync::Arc;

use crate::config::{AppConfig, StoreBackend};

/// Open the configured store and serve the API until the listener closes
pub async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    match config.database.backend {
        StoreBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let database_url = config.database_url()?;
            let postgres_store =
                PostgresStore::new(&database_url, config.max_connections()).await?;

            log::info!("Running database migrations...");
            postgres_store.migrate().await?;

            serve(Arc::new(postgres_store), config).await
        }
        StoreBackend::Memory => {
            log::info!("Using in-memory store; data is lost on shutdown");
            serve(Arc::new(MemoryStore::new()), config).await
        }
    }
}

/// Serve the API over an already opened store
pub async fn serve<S: Store + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    use tokio::net::TcpListener;

    if config.should_load_seed_data() {
        log::info!("Loading seed data...");
        seed::load_seed_data(&*store).await?;
    }

    let app = routes::create_router().with_state(store);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Flight tracker running on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
