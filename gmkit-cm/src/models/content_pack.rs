//! Content pack entity
//!
//! A content pack is a named, versioned collection of rules-data records
//! (spells, monsters, classes, ...) that can be toggled active/inactive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content pack metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPack {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentPack {
    /// Create a new inactive pack with fresh identity and timestamps
    pub fn new(name: String, description: String, version: String, author: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            version,
            author,
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }
}
