//! Deserialization from the raw splits JSON into typed structs.
//!
//! The main entry point is [`from_document`], which takes a
//! `&serde_json::Value` and produces a [`SplitsDocument`]. All six
//! top-level fields are checked for presence before any of them is
//! interpreted, so a document with absent data is always reported as
//! [`DocumentError::MissingField`] rather than as a shape error.

use crate::types::*;
use serde_json::Value;
use std::fmt;

/// Errors during splits document deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The text is not valid JSON.
    Json(String),
    /// The document root is not a JSON object.
    InvalidDocument(String),
    /// A required top-level field is absent (or null).
    MissingField { field: String },
    /// A top-level field is present but has the wrong JSON type.
    InvalidField { field: String, message: String },
    /// A nested segment, history entry or run record is malformed.
    InvalidRecord { path: String, message: String },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Json(msg) => write!(f, "invalid JSON: {}", msg),
            DocumentError::InvalidDocument(msg) => write!(f, "invalid document: {}", msg),
            DocumentError::MissingField { field } => {
                write!(f, "document missing required field: '{}'", field)
            }
            DocumentError::InvalidField { field, message } => {
                write!(f, "field '{}': {}", field, message)
            }
            DocumentError::InvalidRecord { path, message } => {
                write!(f, "{}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for DocumentError {}

impl DocumentError {
    /// True when the document is missing data, as opposed to carrying
    /// data of the wrong shape.
    pub fn is_missing_data(&self) -> bool {
        matches!(self, DocumentError::MissingField { .. })
    }
}

/// Parse JSON text and validate it as a splits document.
pub fn from_str(text: &str) -> Result<SplitsDocument, DocumentError> {
    let value: Value = serde_json::from_str(text).map_err(|e| DocumentError::Json(e.to_string()))?;
    from_document(&value)
}

/// Deserialize a splits JSON document into typed structs.
///
/// Unknown top-level fields are ignored for forward compatibility.
/// `Runs` is a list of lists; it is flattened in order.
pub fn from_document(doc: &Value) -> Result<SplitsDocument, DocumentError> {
    let obj = doc.as_object().ok_or_else(|| {
        DocumentError::InvalidDocument(format!("expected a JSON object, got {}", kind_of(doc)))
    })?;

    for field in TOP_LEVEL_FIELDS {
        if obj.get(field).map_or(true, Value::is_null) {
            return Err(DocumentError::MissingField {
                field: field.to_string(),
            });
        }
    }

    let game_name = top_level_str(doc, "GameName")?;
    let category_name = top_level_str(doc, "CategoryName")?;

    let attempt_count = doc["AttemptCount"]
        .as_u64()
        .ok_or_else(|| DocumentError::InvalidField {
            field: "AttemptCount".to_string(),
            message: format!("expected a non-negative integer, got {}", kind_of(&doc["AttemptCount"])),
        })?;

    let segments = top_level_array(doc, "Segments")?
        .iter()
        .enumerate()
        .map(|(i, seg)| parse_segment(seg, i))
        .collect::<Result<Vec<_>, _>>()?;

    let mut runs = Vec::new();
    for (i, group) in top_level_array(doc, "Runs")?.iter().enumerate() {
        let inner = group.as_array().ok_or_else(|| DocumentError::InvalidRecord {
            path: format!("Runs[{}]", i),
            message: format!("expected an array of runs, got {}", kind_of(group)),
        })?;
        for (j, run) in inner.iter().enumerate() {
            runs.push(parse_attempt(run, &format!("Runs[{}][{}]", i, j))?);
        }
    }

    let pb_splits = top_level_array(doc, "PB_splits")?
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| DocumentError::InvalidRecord {
                    path: format!("PB_splits[{}]", i),
                    message: format!("expected a string, got {}", kind_of(v)),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SplitsDocument {
        game_name,
        category_name,
        attempt_count,
        segments,
        runs,
        pb_splits,
    })
}

// ── Parsing helpers ─────────────────────────────────────────────────

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn top_level_str(doc: &Value, field: &str) -> Result<String, DocumentError> {
    doc[field]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| DocumentError::InvalidField {
            field: field.to_string(),
            message: format!("expected a string, got {}", kind_of(&doc[field])),
        })
}

fn top_level_array<'a>(doc: &'a Value, field: &str) -> Result<&'a Vec<Value>, DocumentError> {
    doc[field]
        .as_array()
        .ok_or_else(|| DocumentError::InvalidField {
            field: field.to_string(),
            message: format!("expected an array, got {}", kind_of(&doc[field])),
        })
}

fn required_str(obj: &Value, field: &str, path: &str) -> Result<String, DocumentError> {
    obj.get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| DocumentError::InvalidRecord {
            path: format!("{}.{}", path, field),
            message: "missing or not a string".to_string(),
        })
}

fn required_id(obj: &Value, path: &str) -> Result<i64, DocumentError> {
    obj.get("AttemptID")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| DocumentError::InvalidRecord {
            path: format!("{}.AttemptID", path),
            message: "missing or not an integer".to_string(),
        })
}

fn parse_segment(obj: &Value, index: usize) -> Result<Segment, DocumentError> {
    let path = format!("Segments[{}]", index);
    let name = required_str(obj, "Name", &path)?;

    let history = obj
        .get("SegmentHistory")
        .and_then(|h| h.as_array())
        .ok_or_else(|| DocumentError::InvalidRecord {
            path: format!("{}.SegmentHistory", path),
            message: "missing or not an array".to_string(),
        })?
        .iter()
        .enumerate()
        .map(|(j, entry)| {
            let entry_path = format!("{}.SegmentHistory[{}]", path, j);
            Ok(HistoryEntry {
                attempt_id: required_id(entry, &entry_path)?,
                game_time: required_str(entry, "GameTime", &entry_path)?,
            })
        })
        .collect::<Result<Vec<_>, DocumentError>>()?;

    Ok(Segment { name, history })
}

fn parse_attempt(obj: &Value, path: &str) -> Result<Attempt, DocumentError> {
    Ok(Attempt {
        attempt_id: required_id(obj, path)?,
        run_start: required_str(obj, "RunStart", path)?,
    })
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
