pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export logic types
pub use logic::ConceptoError;

// Export all model types
pub use model::*;

// Export store types
pub use store::{ConceptoStore, JsonFileStore, PostgresStore};

// Function for integration testing
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with INFO level only (suppress DEBUG logs)
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    // Load configuration
    let config = crate::config::AppConfig::load()?;

    let app = match config.storage.backend {
        crate::config::StorageBackend::Postgres => {
            let database_url = config.database_url()?;
            let max_connections = config.storage.max_connections.unwrap_or(20);
            let store = crate::store::PostgresStore::new(&database_url, max_connections).await?;
            store.migrate().await?;
            crate::api::routes::create_router().with_state(Arc::new(store))
        }
        crate::config::StorageBackend::File => {
            let store = crate::store::JsonFileStore::new(&config.storage.path);
            crate::api::routes::create_router().with_state(Arc::new(store))
        }
    };

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app).await?;

    Ok(())
}
