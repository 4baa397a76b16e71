//! Batch content validator
//!
//! Validates every record of an upload independently: a failure on one
//! record never aborts the batch. Each record lands in exactly one of three
//! tagged outcomes (valid, schema violation, unexpected shape), and failures
//! are keyed by a display identifier derived with a fixed fallback chain.
//! Warnings are not produced here; they belong to the orchestrator.

use crate::models::{UploadPayload, UploadResult};
use crate::registry::{ContentTypeRegistry, RecordSchema};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors that prevent validation from starting at all
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The content type does not resolve in the registry. Rejected before
    /// any record is examined; never reported as failed items.
    #[error("Unknown content type '{content_type}'. Supported types: {supported}")]
    UnknownContentType {
        content_type: String,
        supported: String,
    },
}

/// Outcome of validating one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Record satisfies its content-type schema
    Valid,
    /// Record is an object but violates the schema; message lists the violations
    SchemaViolation(String),
    /// Record could not be validated at all (not a flat field mapping).
    /// Kept as a tagged outcome so one malformed record never aborts the
    /// batch; surfaced as "Unexpected error: ..." in the result.
    Unexpected(String),
}

/// Derive the display identifier for a record's error-report key.
///
/// Fallback chain, total order: the record's `index` field, then its `name`
/// field, then a synthesized `item_<position>` token (0-based position in
/// the submitted sequence). Identifiers are display keys only; two failing
/// records sharing one identifier collapse to a single map entry, last
/// write wins.
pub fn derive_identifier(record: &Value, position: usize) -> String {
    for key in ["index", "name"] {
        match record.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    format!("item_{position}")
}

/// Classify one record against a schema
fn classify_record(schema: &RecordSchema, record: &Value) -> RecordOutcome {
    match record.as_object() {
        Some(map) => match schema.validate(map) {
            Ok(()) => RecordOutcome::Valid,
            Err(message) => RecordOutcome::SchemaViolation(message),
        },
        None => RecordOutcome::Unexpected(format!(
            "record is not a field mapping (got {})",
            json_type_name(record)
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Batch validator over the injected content-type registry
#[derive(Clone)]
pub struct ContentValidator {
    registry: Arc<ContentTypeRegistry>,
}

impl ContentValidator {
    pub fn new(registry: Arc<ContentTypeRegistry>) -> Self {
        Self { registry }
    }

    /// Validate a batch of records against the content type's schema.
    ///
    /// Every record is attempted regardless of earlier outcomes. An empty
    /// batch yields an all-zero result, not an error.
    pub fn validate(
        &self,
        content_type: &str,
        payload: UploadPayload,
    ) -> Result<UploadResult, ValidatorError> {
        self.validate_and_partition(content_type, payload)
            .map(|(result, _)| result)
    }

    /// Validate a batch and also hand back the records that passed, in
    /// submission order, for the persistence step.
    pub fn validate_and_partition(
        &self,
        content_type: &str,
        payload: UploadPayload,
    ) -> Result<(UploadResult, Vec<Value>), ValidatorError> {
        let schema = self.registry.schema_for(content_type).ok_or_else(|| {
            ValidatorError::UnknownContentType {
                content_type: content_type.to_string(),
                supported: self.registry.supported_types().join(", "),
            }
        })?;

        let records = payload.into_records();
        let mut result = UploadResult::new(content_type, records.len());
        let mut valid_records = Vec::new();

        for (position, record) in records.iter().enumerate() {
            match classify_record(schema, record) {
                RecordOutcome::Valid => {
                    result.record_success();
                    valid_records.push(record.clone());
                }
                RecordOutcome::SchemaViolation(message) => {
                    let identifier = derive_identifier(record, position);
                    debug!(content_type, %identifier, %message, "Record failed schema validation");
                    result.record_failure(identifier, message);
                }
                RecordOutcome::Unexpected(message) => {
                    let identifier = derive_identifier(record, position);
                    debug!(content_type, %identifier, %message, "Record failed with unexpected error");
                    result.record_failure(identifier, format!("Unexpected error: {message}"));
                }
            }
        }

        Ok((result, valid_records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> ContentValidator {
        ContentValidator::new(Arc::new(ContentTypeRegistry::builtin().unwrap()))
    }

    fn payload(value: serde_json::Value) -> UploadPayload {
        serde_json::from_value(value).unwrap()
    }

    fn fireball() -> serde_json::Value {
        json!({
            "name": "Fireball",
            "level": 3,
            "school": "evocation",
            "description": "A bright streak flashes to a point you choose."
        })
    }

    #[test]
    fn identifier_prefers_index_then_name_then_position() {
        assert_eq!(derive_identifier(&json!({"index": "srd-fireball", "name": "Fireball"}), 4), "srd-fireball");
        assert_eq!(derive_identifier(&json!({"name": "Fireball"}), 4), "Fireball");
        assert_eq!(derive_identifier(&json!({"index": 7}), 4), "7");
        assert_eq!(derive_identifier(&json!({"level": 3}), 4), "item_4");
        assert_eq!(derive_identifier(&json!("not an object"), 0), "item_0");
    }

    #[test]
    fn empty_identifier_fields_fall_through() {
        assert_eq!(derive_identifier(&json!({"index": "", "name": "Fireball"}), 0), "Fireball");
        assert_eq!(derive_identifier(&json!({"index": "", "name": ""}), 2), "item_2");
    }

    #[test]
    fn well_formed_batch_all_succeeds() {
        let result = validator()
            .validate("spells", payload(json!([fireball()])))
            .unwrap();
        assert_eq!(result.total_items, 1);
        assert_eq!(result.successful_items, 1);
        assert_eq!(result.failed_items, 0);
        assert!(result.validation_errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn single_record_missing_all_required_fields() {
        let result = validator().validate("spells", payload(json!({}))).unwrap();
        assert_eq!(result.total_items, 1);
        assert_eq!(result.successful_items, 0);
        assert_eq!(result.failed_items, 1);
        assert_eq!(result.validation_errors.len(), 1);
        assert!(result.validation_errors["item_0"].contains("missing required field 'name'"));
    }

    #[test]
    fn mixed_batch_keeps_validating_after_a_failure() {
        let result = validator()
            .validate(
                "spells",
                payload(json!([{"name": "Broken"}, fireball(), {"name": "AlsoBroken"}])),
            )
            .unwrap();
        assert_eq!(result.total_items, 3);
        assert_eq!(result.successful_items, 1);
        assert_eq!(result.failed_items, 2);
        assert_eq!(result.validation_errors.len(), 2);
        assert!(result.validation_errors.contains_key("Broken"));
        assert!(result.validation_errors.contains_key("AlsoBroken"));
    }

    #[test]
    fn non_object_record_becomes_unexpected_error_not_abort() {
        let result = validator()
            .validate("spells", payload(json!(["just a string", fireball()])))
            .unwrap();
        assert_eq!(result.total_items, 2);
        assert_eq!(result.successful_items, 1);
        assert_eq!(result.failed_items, 1);
        let message = &result.validation_errors["item_0"];
        assert!(message.starts_with("Unexpected error:"), "got: {message}");
    }

    #[test]
    fn unknown_content_type_is_an_error_not_a_result() {
        let err = validator()
            .validate("vehicles", payload(json!([fireball()])))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("vehicles"));
        assert!(message.contains("spells"));
    }

    #[test]
    fn empty_batch_yields_all_zero_result() {
        let result = validator().validate("spells", payload(json!([]))).unwrap();
        assert_eq!(result.total_items, 0);
        assert_eq!(result.successful_items, 0);
        assert_eq!(result.failed_items, 0);
        assert!(result.validation_errors.is_empty());
    }

    #[test]
    fn validation_is_idempotent() {
        let batch = json!([fireball(), {"name": "Broken"}]);
        let first = validator().validate("spells", payload(batch.clone())).unwrap();
        let second = validator().validate("spells", payload(batch)).unwrap();
        assert_eq!(first.successful_items, second.successful_items);
        assert_eq!(first.failed_items, second.failed_items);
        assert_eq!(first.validation_errors, second.validation_errors);
    }

    #[test]
    fn partition_returns_only_valid_records_in_order() {
        let mut second = fireball();
        second["name"] = json!("Shield");
        second["level"] = json!(1);
        let (result, valid) = validator()
            .validate_and_partition(
                "spells",
                payload(json!([fireball(), {"name": "Broken"}, second.clone()])),
            )
            .unwrap();
        assert_eq!(result.successful_items, 2);
        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0]["name"], "Fireball");
        assert_eq!(valid[1]["name"], "Shield");
    }

    #[test]
    fn counts_always_sum_to_total() {
        let batches = vec![
            json!([]),
            json!([fireball()]),
            json!([{"name": "Broken"}, 42, fireball(), {"level": "x"}]),
        ];
        for batch in batches {
            let result = validator().validate("spells", payload(batch)).unwrap();
            assert_eq!(result.successful_items + result.failed_items, result.total_items);
        }
    }
}
