//! gmkit-cm library interface
//!
//! Content-management service for the GMKit tabletop-RPG assistant:
//! content packs, batch content upload with per-item validation, search
//! indexing, and campaign/character-template state.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod registry;
pub mod services;
pub mod validators;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use registry::ContentTypeRegistry;
use services::{CampaignStore, IndexingTrigger, UploadOrchestrator};
use sqlx::SqlitePool;
use std::sync::Arc;
use validators::ContentValidator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Content-type lookup table, consistency-checked at construction
    pub registry: Arc<ContentTypeRegistry>,
    /// Search indexing trigger (trait object so tests can inject fakes)
    pub indexer: Arc<dyn IndexingTrigger>,
    /// Campaign and character-template file store
    pub campaigns: CampaignStore,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        registry: Arc<ContentTypeRegistry>,
        indexer: Arc<dyn IndexingTrigger>,
        campaigns: CampaignStore,
    ) -> Self {
        Self {
            db,
            registry,
            indexer,
            campaigns,
            startup_time: Utc::now(),
        }
    }

    /// Build the upload pipeline over this state's collaborators
    pub fn upload_orchestrator(&self) -> UploadOrchestrator {
        UploadOrchestrator::new(
            self.db.clone(),
            ContentValidator::new(self.registry.clone()),
            self.indexer.clone(),
        )
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::pack_routes())
        .merge(api::upload_routes())
        .merge(api::campaign_routes())
        .merge(api::health_routes())
        .with_state(state)
}
