//! # GMKit Common Library
//!
//! Shared code for GMKit backend services:
//! - Common error taxonomy
//! - Configuration loading and root folder resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
