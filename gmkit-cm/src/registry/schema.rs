//! Declarative per-content-type record schemas
//!
//! Each content type owns a flat field schema: a list of named fields with
//! an expected JSON shape and a required flag. Validation checks every rule
//! and reports all violations for a record in one human-readable message,
//! so a caller fixing a bad record sees the full picture at once.

use serde_json::{Map, Value};

/// Expected JSON shape of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// JSON string
    Text,
    /// JSON integer (no fractional part)
    Integer,
    /// JSON number, fractional allowed (e.g. challenge rating 0.25)
    Number,
    /// JSON boolean
    Boolean,
    /// JSON array of strings
    TextList,
    /// Nested JSON object (free-form, e.g. ability scores)
    Object,
}

impl FieldKind {
    fn describe(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "an integer",
            FieldKind::Number => "a number",
            FieldKind::Boolean => "a boolean",
            FieldKind::TextList => "a list of text values",
            FieldKind::Object => "an object",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::TextList => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
            FieldKind::Object => value.is_object(),
        }
    }
}

/// One field rule inside a record schema
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    pub fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn text_list(name: &'static str) -> Self {
        Self::new(name, FieldKind::TextList)
    }

    pub fn object(name: &'static str) -> Self {
        Self::new(name, FieldKind::Object)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Flat field schema for one content type
#[derive(Debug, Clone)]
pub struct RecordSchema {
    fields: Vec<FieldRule>,
}

impl RecordSchema {
    pub fn new(fields: Vec<FieldRule>) -> Self {
        Self { fields }
    }

    /// Validate a flat record against every field rule.
    ///
    /// Returns `Err` with a single message listing all violations. Unknown
    /// fields are accepted: packs routinely carry homebrew extras, and the
    /// stored payload keeps them verbatim.
    pub fn validate(&self, record: &Map<String, Value>) -> Result<(), String> {
        let mut violations = Vec::new();

        for rule in &self.fields {
            match record.get(rule.name) {
                None | Some(Value::Null) => {
                    if rule.required {
                        violations.push(format!("missing required field '{}'", rule.name));
                    }
                }
                Some(value) => {
                    if !rule.kind.matches(value) {
                        violations.push(format!(
                            "field '{}' must be {}",
                            rule.name,
                            rule.kind.describe()
                        ));
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spell_like_schema() -> RecordSchema {
        RecordSchema::new(vec![
            FieldRule::text("name").required(),
            FieldRule::integer("level").required(),
            FieldRule::text("school"),
            FieldRule::boolean("ritual"),
            FieldRule::text_list("classes"),
        ])
    }

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn accepts_well_formed_record() {
        let record = as_map(json!({
            "name": "Fireball",
            "level": 3,
            "school": "evocation",
            "ritual": false,
            "classes": ["wizard", "sorcerer"]
        }));
        assert!(spell_like_schema().validate(&record).is_ok());
    }

    #[test]
    fn accepts_unknown_extra_fields() {
        let record = as_map(json!({"name": "Fireball", "level": 3, "homebrew_note": "hot"}));
        assert!(spell_like_schema().validate(&record).is_ok());
    }

    #[test]
    fn reports_all_violations_in_one_message() {
        let record = as_map(json!({"level": "three", "classes": [1, 2]}));
        let message = spell_like_schema().validate(&record).unwrap_err();
        assert!(message.contains("missing required field 'name'"));
        assert!(message.contains("field 'level' must be an integer"));
        assert!(message.contains("field 'classes' must be a list of text values"));
    }

    #[test]
    fn null_counts_as_missing() {
        let record = as_map(json!({"name": null, "level": 1}));
        let message = spell_like_schema().validate(&record).unwrap_err();
        assert!(message.contains("missing required field 'name'"));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let record = as_map(json!({"name": "Shield", "level": 1}));
        assert!(spell_like_schema().validate(&record).is_ok());
    }

    #[test]
    fn fractional_challenge_ratings_are_numbers_not_integers() {
        let schema = RecordSchema::new(vec![FieldRule::number("challenge_rating").required()]);
        let record = as_map(json!({"challenge_rating": 0.25}));
        assert!(schema.validate(&record).is_ok());

        let schema = RecordSchema::new(vec![FieldRule::integer("level").required()]);
        let record = as_map(json!({"level": 1.5}));
        assert!(schema.validate(&record).is_err());
    }
}
