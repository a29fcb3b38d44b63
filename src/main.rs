use axum::serve;
use conceptos_api::api::routes::create_router;
use conceptos_api::config::{AppConfig, StorageBackend};
use conceptos_api::store::{JsonFileStore, PostgresStore};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .init();

    println!("Conceptos API: glossary service");

    // Load configuration
    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}",
        config.server.host, config.server.port
    );

    match config.storage.backend {
        StorageBackend::Postgres => {
            println!("Connecting to PostgreSQL...");
            let database_url = config.database_url()?;
            let max_connections = config.storage.max_connections.unwrap_or(20);
            let store = PostgresStore::new(&database_url, max_connections).await?;

            println!("Bootstrapping conceptos table...");
            store.migrate().await?;
            println!("Database ready");

            run_server(create_router().with_state(Arc::new(store)), &config).await?;
        }
        StorageBackend::File => {
            println!("Using JSON file storage at {}", config.storage.path);
            let store = JsonFileStore::new(&config.storage.path);

            run_server(create_router().with_state(Arc::new(store)), &config).await?;
        }
    }

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!("Conceptos server running on http://{}", bind_address);
    println!(
        "API available at http://{}/api/conceptos (buscar?q=, stats)",
        bind_address
    );

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install ctrl-c handler: {}", e);
        return;
    }
    println!("Shutting down...");
}
