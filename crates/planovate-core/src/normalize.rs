//! Project list normalization.
//!
//! The storage collaborator's list call does not commit to one response
//! shape. Depending on API version it answers with `{"rows": [...]}`,
//! `{"documents": [...]}`, or a bare array. [`ProjectListEnvelope::decode`]
//! turns the raw JSON into one explicit case per recognised shape, and
//! [`normalize_project_list`] flattens any of them into the canonical,
//! order-preserving sequence the history view consumes.
//!
//! Normalization never fails. Unrecognised envelopes yield an empty list and
//! individual rows that cannot be decoded are skipped.

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::models::{ProjectRecord, RawProjectList};

/// Recognised list response shapes, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectListEnvelope {
    /// `{"rows": [...]}`
    Rows(Vec<Value>),
    /// `{"documents": [...]}`
    Documents(Vec<Value>),
    /// `[...]`
    Bare(Vec<Value>),
    /// Anything else, including `null` and objects without a list field.
    Unrecognized,
}

impl ProjectListEnvelope {
    /// Classify a raw list response.
    ///
    /// An object exposing both `rows` and `documents` as arrays is treated as
    /// `Rows`. A `rows` field that is not an array does not shadow a valid
    /// `documents` array.
    pub fn decode(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                if let Some(Value::Array(rows)) = map.remove("rows") {
                    return Self::Rows(rows);
                }
                if let Some(Value::Array(documents)) = map.remove("documents") {
                    return Self::Documents(documents);
                }
                Self::Unrecognized
            }
            Value::Array(items) => Self::Bare(items),
            _ => Self::Unrecognized,
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Self::Rows(_) => "rows",
            Self::Documents(_) => "documents",
            Self::Bare(_) => "bare",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// The raw items carried by the envelope.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::Rows(items) | Self::Documents(items) | Self::Bare(items) => items,
            Self::Unrecognized => Vec::new(),
        }
    }
}

/// Produce the canonical ordered project sequence from a raw list response.
pub fn normalize_project_list(raw: RawProjectList) -> Vec<ProjectRecord> {
    let envelope = ProjectListEnvelope::decode(raw.0);
    let shape = envelope.shape();
    debug!(
        subsystem = "core",
        component = "normalizer",
        shape,
        "Decoded project list envelope"
    );

    let items = envelope.into_items();
    let total = items.len();
    let records: Vec<ProjectRecord> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => {
                trace!(index, "Decoded project row");
                Some(record)
            }
            Err(e) => {
                warn!(index, error = %e, "Skipping undecodable project row");
                None
            }
        })
        .collect();

    debug!(
        shape,
        result_count = records.len(),
        skipped = total - records.len(),
        "Normalized project list"
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str) -> Value {
        json!({"$id": id, "Title": format!("Project {}", id), "Budget": 20000})
    }

    fn ids(records: &[ProjectRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_all_envelopes_yield_same_sequence() {
        let from_rows = normalize_project_list(json!({"rows": [row("a"), row("b")]}).into());
        let from_docs =
            normalize_project_list(json!({"documents": [row("a"), row("b")]}).into());
        let from_bare = normalize_project_list(json!([row("a"), row("b")]).into());

        assert_eq!(ids(&from_rows), vec!["a", "b"]);
        assert_eq!(from_rows, from_docs);
        assert_eq!(from_rows, from_bare);
    }

    #[test]
    fn test_empty_object_and_null_yield_empty() {
        assert!(normalize_project_list(json!({}).into()).is_empty());
        assert!(normalize_project_list(Value::Null.into()).is_empty());
    }

    #[test]
    fn test_unrecognized_shapes_yield_empty() {
        assert!(normalize_project_list(json!("rows").into()).is_empty());
        assert!(normalize_project_list(json!(42).into()).is_empty());
        assert!(normalize_project_list(json!({"total": 2}).into()).is_empty());
    }

    #[test]
    fn test_rows_take_priority_over_documents() {
        let raw = json!({"rows": [row("r")], "documents": [row("d")]});
        assert_eq!(ids(&normalize_project_list(raw.into())), vec!["r"]);
    }

    #[test]
    fn test_non_array_rows_falls_through_to_documents() {
        let raw = json!({"rows": null, "documents": [row("d")]});
        assert_eq!(ids(&normalize_project_list(raw.into())), vec!["d"]);
    }

    #[test]
    fn test_envelope_with_extra_fields() {
        let raw = json!({"total": 1, "rows": [row("a")]});
        let envelope = ProjectListEnvelope::decode(raw);
        assert_eq!(envelope.shape(), "rows");
    }

    #[test]
    fn test_undecodable_rows_are_skipped_in_order() {
        let raw = json!([row("a"), "garbage", {"Title": "no id"}, row("b")]);
        assert_eq!(ids(&normalize_project_list(raw.into())), vec!["a", "b"]);
    }

    #[test]
    fn test_rows_with_missing_display_fields_survive() {
        let raw = json!({"rows": [{"$id": "bare"}]});
        let records = normalize_project_list(raw.into());
        assert_eq!(records.len(), 1);
        assert!(records[0].budget.is_none());
        assert!(records[0].description.is_none());
        assert!(records[0].created_at.is_none());
    }
}
