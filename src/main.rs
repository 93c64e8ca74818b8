use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use crewbase::config::{AppConfig, CliArgs};
use crewbase::db::store::EmployeeStore;
use crewbase::llm::LlmManager;
use crewbase::util::logging::init_tracing;
use crewbase::web::{self, state::AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let config = match AppConfig::new(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Open the store, creating the employee schema if it is missing
    info!("Opening employee database at {}", config.database.path);
    let store = EmployeeStore::open(&config.database.path)?;

    // Initialize LLM manager
    info!("Initializing LLM manager with backend: {}", config.llm.backend);
    let llm = LlmManager::new(&config.llm)?;

    let state = Arc::new(AppState::new(config.clone(), store, llm));

    // Start the web server
    info!(
        "Starting crewbase server on {}:{}",
        config.web.host, config.web.port
    );
    match web::run_server(config.web, state).await {
        Ok(_) => info!("Server stopped gracefully"),
        Err(e) => {
            error!("Server error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
