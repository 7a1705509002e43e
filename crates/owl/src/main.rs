//! Minerva Owl
//!
//! Organization and user management service.

use clap::Parser;
use owl::{AppState, OwlConfig, connect_store, init_logging};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = OwlConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        backend = %config.backend,
        database = %config.db_name,
        operation_timeout = ?config.operation_timeout,
        "Starting Minerva Owl"
    );

    let store = connect_store(&config).await?;
    let state = AppState::new(store, config)?;
    info!(backend = state.store().backend_name(), "Owl ready");

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    Ok(())
}
