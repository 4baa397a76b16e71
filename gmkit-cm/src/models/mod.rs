//! Data models for gmkit-cm (Content Management service)

pub mod content_pack;
pub mod upload;

pub use content_pack::ContentPack;
pub use upload::{UploadPayload, UploadResult};
