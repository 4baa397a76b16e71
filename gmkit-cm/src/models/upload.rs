//! Content upload payload and aggregate result
//!
//! `UploadResult` is the single report shape for one batch upload: it is
//! serialized unchanged whether the batch fully succeeded (200) or partially
//! failed (422), so callers always inspect the same fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Upload request body: one record or an ordered sequence of records
///
/// Records are flat field mappings; per-type field requirements are enforced
/// by the schema registry, not by this type.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UploadPayload {
    /// Ordered batch of records
    Many(Vec<Value>),
    /// Single record, normalized to a one-element batch before validation
    Single(Value),
}

impl UploadPayload {
    /// Normalize into an ordered sequence (uniform handling downstream)
    pub fn into_records(self) -> Vec<Value> {
        match self {
            UploadPayload::Many(records) => records,
            UploadPayload::Single(record) => vec![record],
        }
    }

    /// Number of records in the payload
    pub fn len(&self) -> usize {
        match self {
            UploadPayload::Many(records) => records.len(),
            UploadPayload::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Aggregate success/failure report for one batch content upload
///
/// Invariant: `successful_items + failed_items == total_items`. Constructed
/// fresh per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    /// Content type the batch was validated against
    pub content_type: String,
    /// Count of records submitted
    pub total_items: usize,
    /// Count of records that passed schema validation
    pub successful_items: usize,
    /// Count of records that failed validation
    pub failed_items: usize,
    /// Per-item error messages, keyed by the record's display identifier.
    /// Identifiers are not guaranteed unique; on collision the later
    /// record's message wins.
    pub validation_errors: HashMap<String, String>,
    /// Free-text notices appended by downstream steps, in append order
    pub warnings: Vec<String>,
}

impl UploadResult {
    /// Create an empty result for a batch of `total_items` records
    pub fn new(content_type: impl Into<String>, total_items: usize) -> Self {
        Self {
            content_type: content_type.into(),
            total_items,
            successful_items: 0,
            failed_items: 0,
            validation_errors: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Count one record as validated successfully
    pub fn record_success(&mut self) {
        self.successful_items += 1;
    }

    /// Count one record as failed and store its error message
    pub fn record_failure(&mut self, identifier: String, message: String) {
        self.failed_items += 1;
        self.validation_errors.insert(identifier, message);
    }

    /// Append a downstream notice (indexing outcome, etc.)
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// True when every record in the batch validated
    pub fn is_fully_successful(&self) -> bool {
        self.failed_items == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_record_normalizes_to_one_element_batch() {
        let payload: UploadPayload = serde_json::from_value(json!({"name": "Fireball"})).unwrap();
        let records = payload.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "Fireball");
    }

    #[test]
    fn array_payload_preserves_order() {
        let payload: UploadPayload =
            serde_json::from_value(json!([{"name": "a"}, {"name": "b"}])).unwrap();
        let records = payload.into_records();
        assert_eq!(records[0]["name"], "a");
        assert_eq!(records[1]["name"], "b");
    }

    #[test]
    fn counts_track_successes_and_failures() {
        let mut result = UploadResult::new("spells", 3);
        result.record_success();
        result.record_failure("item_1".to_string(), "missing field".to_string());
        result.record_success();

        assert_eq!(result.total_items, 3);
        assert_eq!(result.successful_items + result.failed_items, result.total_items);
        assert_eq!(result.validation_errors.len(), result.failed_items);
        assert!(!result.is_fully_successful());
    }

    #[test]
    fn duplicate_identifiers_last_write_wins() {
        let mut result = UploadResult::new("spells", 2);
        result.record_failure("fireball".to_string(), "first".to_string());
        result.record_failure("fireball".to_string(), "second".to_string());

        assert_eq!(result.failed_items, 2);
        assert_eq!(result.validation_errors.len(), 1);
        assert_eq!(result.validation_errors["fireball"], "second");
    }

    #[test]
    fn serializes_flat() {
        let result = UploadResult::new("spells", 0);
        let value = serde_json::to_value(&result).unwrap();
        for field in [
            "content_type",
            "total_items",
            "successful_items",
            "failed_items",
            "validation_errors",
            "warnings",
        ] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
    }
}
