//! Service modules for the content-management pipeline

pub mod campaign_store;
pub mod indexer;
pub mod upload_orchestrator;

pub use campaign_store::CampaignStore;
pub use indexer::{IndexingTrigger, SearchIndexer};
pub use upload_orchestrator::{UploadError, UploadOrchestrator, UploadPhase};
