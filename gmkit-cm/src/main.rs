//! gmkit-cm - Content Management service
//!
//! Backend for the GMKit tabletop-RPG assistant: manages content packs,
//! validates and imports bulk content uploads, maintains the search index,
//! and persists campaign/character-template state.

use anyhow::Result;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use gmkit_cm::registry::ContentTypeRegistry;
use gmkit_cm::services::{CampaignStore, SearchIndexer};
use gmkit_cm::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting gmkit-cm (Content Management) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve configuration and root folder
    let config = gmkit_common::config::GmkitConfig::load()?;
    let cli_root = std::env::args().nth(1);
    let root = gmkit_common::config::resolve_root_folder(cli_root.as_deref(), &config);
    gmkit_common::config::ensure_root_folder(&root)?;
    info!("Root folder: {}", root.display());

    // Open or create database
    let db_path = config.database_path(&root);
    info!("Database: {}", db_path.display());
    let db_pool = gmkit_cm::db::init_database_pool(&db_path).await?;

    // Build the content-type registry; an inconsistent registry is a fatal
    // configuration error and the process must not serve
    let registry = Arc::new(ContentTypeRegistry::builtin()?);
    info!(
        "Content type registry loaded: {}",
        registry.supported_types().join(", ")
    );

    // Campaign/template file store under the root folder
    let campaigns = CampaignStore::new(&root)?;

    // Search indexer over the shared pool
    let indexer = Arc::new(SearchIndexer::new(db_pool.clone()));

    let state = AppState::new(db_pool, registry, indexer, campaigns);
    let app = gmkit_cm::build_router(state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
