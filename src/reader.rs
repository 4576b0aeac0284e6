use csv::ReaderBuilder;

use crate::errors::LoadError;
use crate::models::record::{FieldValue, Record};

/// Delimiter used by the CSV sources this tool accepts.
const CSV_DELIMITER: u8 = b';';

/// Decodes a JSON array of flat objects into records, in file order.
pub fn read_json(data: &[u8]) -> Result<Vec<Record>, LoadError> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> =
        serde_json::from_slice(data).map_err(|e| LoadError::Parse(e.to_string()))?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut record = Record::with_capacity(row.len());
        for (key, value) in row {
            record.insert(key.clone(), FieldValue::from_json(value)?);
        }
        records.push(record);
    }
    Ok(records)
}

/// Decodes semicolon-delimited CSV into records, in file order.
///
/// The first line is the header row. Cells that parse as base-10 integers
/// become `Int`, everything else stays `Text` (including the literal `NULL`
/// marker, which the projector interprets). A row with a different field
/// count than the header is a parse error.
pub fn read_csv(data: &[u8]) -> Result<Vec<Record>, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(CSV_DELIMITER)
        .from_reader(data);

    let headers = rdr
        .headers()
        .map_err(|e| LoadError::Parse(e.to_string()))?
        .clone();

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|e| LoadError::Parse(e.to_string()))?;
        let mut record = Record::with_capacity(headers.len());
        for (header, cell) in headers.iter().zip(row.iter()) {
            record.insert(header.to_string(), FieldValue::from_csv_cell(cell));
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_array() {
        let data = br#"[{"id": 1, "name": "Alice"}, {"id": 2, "name": null}]"#;
        let records = read_json(data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], FieldValue::Int(1));
        assert_eq!(records[0]["name"], FieldValue::Text("Alice".to_string()));
        assert_eq!(records[1]["name"], FieldValue::Null);
    }

    #[test]
    fn test_read_json_rejects_non_array() {
        let result = read_json(br#"{"id": 1}"#);
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_read_json_rejects_nested_values() {
        let result = read_json(br#"[{"id": 1, "tags": ["a", "b"]}]"#);
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_read_json_rejects_malformed_input() {
        let result = read_json(b"[{\"id\": 1,");
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_read_csv_with_integer_detection() {
        let data = b"id;name;zip\n1;Alice;10115\n2;Bob;text";
        let records = read_csv(data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], FieldValue::Int(1));
        assert_eq!(records[0]["name"], FieldValue::Text("Alice".to_string()));
        // Numeric-looking strings become integers; known ambiguity.
        assert_eq!(records[0]["zip"], FieldValue::Int(10115));
        assert_eq!(records[1]["zip"], FieldValue::Text("text".to_string()));
    }

    #[test]
    fn test_read_csv_null_marker_stays_text() {
        let data = b"id;name\n1;NULL";
        let records = read_csv(data).unwrap();
        assert_eq!(records[0]["name"], FieldValue::Text("NULL".to_string()));
    }

    #[test]
    fn test_read_csv_ragged_row_is_parse_error() {
        let data = b"id;name\n1;Alice;extra";
        let result = read_csv(data);
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_read_csv_empty_body() {
        let records = read_csv(b"id;name\n").unwrap();
        assert!(records.is_empty());
    }
}
