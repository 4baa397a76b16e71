//! Content type registry
//!
//! Maps each content-type identifier (kebab-case, stable) to its validation
//! schema and its storage-entity descriptor. The registry is built once at
//! startup and injected via `AppState`; construction runs a consistency
//! check over the two maps and refuses to produce a registry whose schema
//! and entity key-sets differ, so a misconfigured build never serves.

pub mod schema;

pub use schema::{FieldKind, FieldRule, RecordSchema};

use gmkit_common::{Error, Result};
use std::collections::HashMap;

/// Storage descriptor for one content type
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    /// Storage key used for record scoping and search indexing
    pub collection: &'static str,
    /// Singular display name for messages ("Spell", "Monster", ...)
    pub display: &'static str,
}

/// Immutable content-type lookup table
#[derive(Debug)]
pub struct ContentTypeRegistry {
    schemas: HashMap<&'static str, RecordSchema>,
    entities: HashMap<&'static str, EntityDescriptor>,
}

impl ContentTypeRegistry {
    /// Build a registry from a schema map and an entity map.
    ///
    /// Fails with a configuration error naming the missing keys on each
    /// side if the two key-sets are not identical.
    pub fn new(
        schemas: HashMap<&'static str, RecordSchema>,
        entities: HashMap<&'static str, EntityDescriptor>,
    ) -> Result<Self> {
        let mut missing_entities: Vec<&str> = schemas
            .keys()
            .filter(|k| !entities.contains_key(*k))
            .copied()
            .collect();
        let mut missing_schemas: Vec<&str> = entities
            .keys()
            .filter(|k| !schemas.contains_key(*k))
            .copied()
            .collect();

        if !missing_entities.is_empty() || !missing_schemas.is_empty() {
            missing_entities.sort_unstable();
            missing_schemas.sort_unstable();
            return Err(Error::Config(format!(
                "Content type registry is inconsistent: \
                 types with a schema but no entity descriptor: [{}]; \
                 types with an entity descriptor but no schema: [{}]",
                missing_entities.join(", "),
                missing_schemas.join(", ")
            )));
        }

        Ok(Self { schemas, entities })
    }

    /// Registry of the built-in rules-data content types
    pub fn builtin() -> Result<Self> {
        let mut schemas = HashMap::new();
        let mut entities = HashMap::new();

        for (content_type, display, schema) in builtin_definitions() {
            schemas.insert(content_type, schema);
            entities.insert(
                content_type,
                EntityDescriptor {
                    collection: content_type,
                    display,
                },
            );
        }

        Self::new(schemas, entities)
    }

    /// Validation schema for a content type, if registered
    pub fn schema_for(&self, content_type: &str) -> Option<&RecordSchema> {
        self.schemas.get(content_type)
    }

    /// Storage-entity descriptor for a content type, if registered
    pub fn entity_for(&self, content_type: &str) -> Option<&EntityDescriptor> {
        self.entities.get(content_type)
    }

    /// All registered content-type identifiers, sorted
    pub fn supported_types(&self) -> Vec<&'static str> {
        let mut types: Vec<&'static str> = self.schemas.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// True when the identifier resolves in the registry
    pub fn is_supported(&self, content_type: &str) -> bool {
        self.schemas.contains_key(content_type)
    }
}

/// Built-in content-type definitions: (identifier, display name, schema)
fn builtin_definitions() -> Vec<(&'static str, &'static str, RecordSchema)> {
    vec![
        (
            "spells",
            "Spell",
            RecordSchema::new(vec![
                FieldRule::text("name").required(),
                FieldRule::integer("level").required(),
                FieldRule::text("school").required(),
                FieldRule::text("description").required(),
                FieldRule::text("casting_time"),
                FieldRule::text("range"),
                FieldRule::text("duration"),
                FieldRule::text_list("components"),
                FieldRule::text_list("classes"),
                FieldRule::boolean("ritual"),
                FieldRule::boolean("concentration"),
            ]),
        ),
        (
            "monsters",
            "Monster",
            RecordSchema::new(vec![
                FieldRule::text("name").required(),
                FieldRule::text("size").required(),
                FieldRule::text("creature_type").required(),
                FieldRule::integer("armor_class").required(),
                FieldRule::integer("hit_points").required(),
                FieldRule::number("challenge_rating").required(),
                FieldRule::object("ability_scores"),
                FieldRule::object("speed"),
                FieldRule::text("alignment"),
                FieldRule::text("description"),
            ]),
        ),
        (
            "classes",
            "Class",
            RecordSchema::new(vec![
                FieldRule::text("name").required(),
                FieldRule::integer("hit_die").required(),
                FieldRule::text("primary_ability").required(),
                FieldRule::text_list("saving_throws").required(),
                FieldRule::object("proficiencies"),
                FieldRule::text("description"),
            ]),
        ),
        (
            "items",
            "Item",
            RecordSchema::new(vec![
                FieldRule::text("name").required(),
                FieldRule::text("category").required(),
                FieldRule::text("rarity").required(),
                FieldRule::text("description").required(),
                FieldRule::text("cost"),
                FieldRule::number("weight"),
                FieldRule::boolean("requires_attunement"),
            ]),
        ),
        (
            "races",
            "Race",
            RecordSchema::new(vec![
                FieldRule::text("name").required(),
                FieldRule::text("size").required(),
                FieldRule::integer("speed").required(),
                FieldRule::object("ability_bonuses"),
                FieldRule::text_list("languages"),
                FieldRule::text("description"),
            ]),
        ),
        (
            "backgrounds",
            "Background",
            RecordSchema::new(vec![
                FieldRule::text("name").required(),
                FieldRule::text("feature").required(),
                FieldRule::text_list("skill_proficiencies").required(),
                FieldRule::text_list("equipment"),
                FieldRule::text("description"),
            ]),
        ),
        (
            "feats",
            "Feat",
            RecordSchema::new(vec![
                FieldRule::text("name").required(),
                FieldRule::text("description").required(),
                FieldRule::text("prerequisite"),
            ]),
        ),
        (
            "conditions",
            "Condition",
            RecordSchema::new(vec![
                FieldRule::text("name").required(),
                FieldRule::text("description").required(),
                FieldRule::text_list("effects"),
            ]),
        ),
    ]
}
