use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::LoadError;

/// Source file format, derived from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Json,
    Csv,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Result<Self, LoadError> {
        match ext {
            "json" => Ok(SourceFormat::Json),
            "csv" => Ok(SourceFormat::Csv),
            other => Err(LoadError::Format(format!("incorrect format: {}", other))),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Json => write!(f, "json"),
            SourceFormat::Csv => write!(f, "csv"),
        }
    }
}

/// One loosely-typed cell value.
///
/// Kept as a closed variant rather than `serde_json::Value` so the projector's
/// branches stay exhaustive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Int(i64),
    Text(String),
    Null,
}

impl FieldValue {
    pub fn from_json(value: &serde_json::Value) -> Result<Self, LoadError> {
        match value {
            serde_json::Value::Null => Ok(FieldValue::Null),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(FieldValue::Int(i)),
                None => Ok(FieldValue::Text(n.to_string())),
            },
            serde_json::Value::String(s) => Ok(FieldValue::Text(s.clone())),
            serde_json::Value::Bool(b) => Ok(FieldValue::Text(b.to_string())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(LoadError::Parse(
                "nested values are not supported in records".to_string(),
            )),
        }
    }

    /// CSV cells carry no type information; a cell that parses as a base-10
    /// integer becomes `Int`, anything else stays `Text`.
    pub fn from_csv_cell(cell: &str) -> Self {
        match cell.parse::<i64>() {
            Ok(i) => FieldValue::Int(i),
            Err(_) => FieldValue::Text(cell.to_string()),
        }
    }
}

/// One row to insert, keyed by CSV header or JSON object key. Keys are not
/// guaranteed to match schema column names.
pub type Record = HashMap<String, FieldValue>;
