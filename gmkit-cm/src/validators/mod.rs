//! Content validation layer
//!
//! Validates batches of raw content records against the schema registry,
//! producing the per-item pass/fail accounting the upload pipeline reports.

pub mod content_validator;

pub use content_validator::{derive_identifier, ContentValidator, RecordOutcome, ValidatorError};
