//! HTTP API handlers for gmkit-cm

pub mod campaigns;
pub mod health;
pub mod packs;
pub mod upload;

pub use campaigns::campaign_routes;
pub use health::health_routes;
pub use packs::pack_routes;
pub use upload::upload_routes;
