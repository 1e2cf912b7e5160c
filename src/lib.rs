pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod risk;

use tracing_subscriber::EnvFilter;

use crate::api::{start_server, ApiContext};
use crate::config::{ConfigError, ServerConfig};
use crate::db::DatabaseError;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Database unavailable: {0}")]
    Database(#[from] DatabaseError),
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the server and block until Ctrl-C.
pub fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = ServerConfig::from_env()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(config))
}

async fn serve(config: ServerConfig) -> Result<(), StartupError> {
    // Open once up front so schema problems fail startup, not the first request.
    let conn = db::open_database(&config.database_path)?;
    let patients = db::count_patients(&conn)?;
    drop(conn);
    tracing::info!(
        path = %config.database_path.display(),
        patients,
        "Database ready"
    );

    let ctx = ApiContext::new(config.database_path);
    let mut server = start_server(ctx, config.bind_addr)
        .await
        .map_err(StartupError::Server)?;
    tracing::info!(addr = %server.addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl-C: {e}");
    }
    server.shutdown();
    server.wait().await;
    Ok(())
}
