//! NutriTrack
//!
//! An MCP server for food diary and nutrition goal tracking.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutritrack::build_info;
use nutritrack::catalog::{CachedCatalog, FoodCatalog, UsdaClient};
use nutritrack::config::{Config, StorageBackend};
use nutritrack::db::Database;
use nutritrack::mcp::NutriTrackService;
use nutritrack::store::{MemoryStore, NutritionStore, SqliteStore};
use nutritrack::tools::status::StatusTracker;

fn open_store(config: &Config) -> Result<Arc<dyn NutritionStore>, Box<dyn std::error::Error>> {
    match config.storage {
        StorageBackend::Sqlite => {
            let db_path = &config.database_path;
            eprintln!("Database path: {}", db_path.display());

            // Ensure data directory exists
            if let Some(parent) = db_path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let store = SqliteStore::new(Database::new(db_path)?)?;
            let version = store
                .database()
                .with_conn(nutritrack::db::migrations::get_schema_version)?;
            eprintln!("Database schema version: {}", version);
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            eprintln!("Using session-only memory storage");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries MCP traffic
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutritrack=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env();
    let store = open_store(&config)?;

    if config.uses_demo_key() {
        tracing::warn!("USDA_API_KEY not set, using the rate-limited demo key");
    }

    // The blocking HTTP client must be built off the async runtime
    let (base_url, api_key) = (config.fdc_base_url.clone(), config.usda_api_key.clone());
    let client = tokio::task::spawn_blocking(move || UsdaClient::new(base_url, api_key)).await??;
    let catalog: Arc<dyn FoodCatalog> = Arc::new(CachedCatalog::new(client));

    let database_path = match config.storage {
        StorageBackend::Sqlite => Some(config.database_path.clone()),
        StorageBackend::Memory => None,
    };
    let tracker = StatusTracker::new(store.backend(), database_path, config.uses_demo_key());

    let service = NutriTrackService::new(tracker, store, catalog);

    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
