//! Snapshot format: a JSON array of element records.
//!
//! Decoding is forgiving. Records written by older versions are backfilled
//! with defaults and records that cannot be decoded at all are skipped, so a
//! single bad entry never costs the whole layout.

use crate::element::{DEFAULT_DRAW_SIZE, Element};
use serde_json::Value;
use thiserror::Error;

/// Snapshot decoding errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Snapshot is not a sequence of elements")]
    NotASequence,
}

/// A decoded snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Elements in stored order.
    pub elements: Vec<Element>,
    /// Number of records that could not be decoded.
    pub skipped: usize,
}

/// Result of restoring a session from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing was stored.
    Empty,
    Restored { count: usize, skipped: usize },
    /// The stored value could not be read or is not a snapshot. The session
    /// starts empty.
    Failed { reason: String },
}

impl LoadOutcome {
    /// One-line notice for the user, if the outcome warrants one.
    pub fn notice(&self) -> Option<String> {
        match self {
            LoadOutcome::Empty => None,
            LoadOutcome::Restored { skipped: 0, .. } => None,
            LoadOutcome::Restored { count, skipped } => Some(format!(
                "Restored {} elements, skipped {} unreadable",
                count, skipped
            )),
            LoadOutcome::Failed { reason } => Some(format!("Could not load saved layout: {}", reason)),
        }
    }
}

/// Serialize elements in snapshot form.
pub fn encode(elements: &[Element]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(elements)?)
}

/// Serialize elements in snapshot form, indented.
pub fn encode_pretty(elements: &[Element]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(elements)?)
}

/// Decode a snapshot.
pub fn decode(text: &str) -> Result<Snapshot, SnapshotError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(records) = value else {
        return Err(SnapshotError::NotASequence);
    };

    let mut snapshot = Snapshot::default();
    for (index, mut record) in records.into_iter().enumerate() {
        backfill(&mut record);
        match serde_json::from_value::<Element>(record) {
            Ok(element) => snapshot.elements.push(element),
            Err(e) => {
                log::warn!("Skipping snapshot record {}: {}", index, e);
                snapshot.skipped += 1;
            }
        }
    }
    Ok(snapshot)
}

/// Patch values that serde defaults cannot express.
fn backfill(record: &mut Value) {
    let Some(fields) = record.as_object_mut() else {
        return;
    };
    let size_ok = fields
        .get("drawSize")
        .and_then(Value::as_f64)
        .is_some_and(|size| size > 0.0);
    if !size_ok {
        fields.insert("drawSize".to_string(), Value::from(DEFAULT_DRAW_SIZE));
    }
    for key in ["drawPoints", "imageSrc", "text", "drawColor", "styles"] {
        if fields.get(key).is_some_and(Value::is_null) {
            fields.remove(key);
        }
    }
}
