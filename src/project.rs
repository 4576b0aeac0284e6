use crate::errors::LoadError;
use crate::models::record::{FieldValue, Record, SourceFormat};
use crate::models::schema::TableMeta;

/// Server-managed row-version type; never settable by an INSERT.
const TIMESTAMP_TYPE: &str = "timestamp";

/// Projects one record onto a table's schema, producing the ordered
/// (column, value) pairs to insert.
///
/// Iteration is schema-driven rather than record-driven so that every
/// NOT-NULL, no-default column is checked for presence before the row ever
/// reaches the database. Per column:
///
/// - computed or timestamp-typed columns are skipped outright, whether or
///   not the record carries a value for them;
/// - a CSV cell holding the literal `NULL` marker is skipped when the column
///   is nullable or has a default, and is a fatal validation error otherwise;
/// - a column absent from the record is silently omitted when nullable or
///   defaulted, and fatal otherwise.
///
/// Column names in the output are bracket-quoted to survive reserved words.
/// An empty result is not an error; the caller decides what it means.
pub fn project(
    record: &Record,
    meta: &TableMeta,
    format: SourceFormat,
) -> Result<Vec<(String, FieldValue)>, LoadError> {
    let mut projected = Vec::with_capacity(meta.columns.len());

    for col in &meta.columns {
        if col.data_type == TIMESTAMP_TYPE || meta.computed_columns.contains(&col.name) {
            continue;
        }

        match record.get(&col.name) {
            Some(value) => {
                let is_csv_null = format == SourceFormat::Csv
                    && matches!(value, FieldValue::Text(s) if s == "NULL");
                if is_csv_null {
                    if !col.has_fallback() {
                        return Err(LoadError::Validation {
                            field: col.name.clone(),
                            source: format.to_string(),
                        });
                    }
                    // Let the database apply NULL or the default.
                    continue;
                }
                projected.push((format!("[{}]", col.name), value.clone()));
            }
            None => {
                if !col.has_fallback() {
                    return Err(LoadError::Validation {
                        field: col.name.clone(),
                        source: format.to_string(),
                    });
                }
            }
        }
    }

    Ok(projected)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::models::schema::ColumnSchema;

    fn column(name: &str, data_type: &str, nullable: bool, default: Option<&str>) -> ColumnSchema {
        ColumnSchema {
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable: nullable,
            default: default.map(str::to_string),
        }
    }

    fn meta(columns: Vec<ColumnSchema>) -> TableMeta {
        TableMeta {
            table_name: "t".to_string(),
            columns,
            is_identity: false,
            computed_columns: HashSet::new(),
        }
    }

    fn users_meta() -> TableMeta {
        meta(vec![
            column("id", "int", false, None),
            column("name", "varchar", true, None),
        ])
    }

    #[test]
    fn test_full_record_projects_all_columns_in_schema_order() {
        let record = Record::from([
            ("name".to_string(), FieldValue::Text("Alice".to_string())),
            ("id".to_string(), FieldValue::Int(1)),
        ]);

        let projected = project(&record, &users_meta(), SourceFormat::Json).unwrap();

        assert_eq!(
            projected,
            vec![
                ("[id]".to_string(), FieldValue::Int(1)),
                ("[name]".to_string(), FieldValue::Text("Alice".to_string())),
            ]
        );
    }

    #[test]
    fn test_absent_nullable_column_is_omitted() {
        let record = Record::from([("id".to_string(), FieldValue::Int(2))]);

        let projected = project(&record, &users_meta(), SourceFormat::Json).unwrap();

        assert_eq!(projected, vec![("[id]".to_string(), FieldValue::Int(2))]);
    }

    #[test]
    fn test_absent_required_column_is_fatal() {
        let record = Record::from([("name".to_string(), FieldValue::Text("x".to_string()))]);

        let err = project(&record, &users_meta(), SourceFormat::Json).unwrap_err();

        match err {
            LoadError::Validation { field, source } => {
                assert_eq!(field, "id");
                assert_eq!(source, "json");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_absent_defaulted_column_is_omitted() {
        let schema = meta(vec![
            column("id", "int", false, None),
            column("created_at", "datetime", false, Some("(getdate())")),
        ]);
        let record = Record::from([("id".to_string(), FieldValue::Int(1))]);

        let projected = project(&record, &schema, SourceFormat::Json).unwrap();

        assert_eq!(projected, vec![("[id]".to_string(), FieldValue::Int(1))]);
    }

    #[test]
    fn test_csv_null_marker_on_nullable_column_is_omitted() {
        let record = Record::from([
            ("id".to_string(), FieldValue::Int(1)),
            ("name".to_string(), FieldValue::Text("NULL".to_string())),
        ]);

        let projected = project(&record, &users_meta(), SourceFormat::Csv).unwrap();

        assert_eq!(projected, vec![("[id]".to_string(), FieldValue::Int(1))]);
    }

    #[test]
    fn test_csv_null_marker_on_required_column_is_fatal() {
        let record = Record::from([
            ("id".to_string(), FieldValue::Text("NULL".to_string())),
            ("name".to_string(), FieldValue::Text("Bob".to_string())),
        ]);

        let err = project(&record, &users_meta(), SourceFormat::Csv).unwrap_err();

        match err {
            LoadError::Validation { field, source } => {
                assert_eq!(field, "id");
                assert_eq!(source, "csv");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_json_null_marker_text_is_inserted_verbatim() {
        // The NULL marker is a CSV convention only.
        let record = Record::from([
            ("id".to_string(), FieldValue::Int(1)),
            ("name".to_string(), FieldValue::Text("NULL".to_string())),
        ]);

        let projected = project(&record, &users_meta(), SourceFormat::Json).unwrap();

        assert_eq!(projected.len(), 2);
        assert_eq!(projected[1].1, FieldValue::Text("NULL".to_string()));
    }

    #[test]
    fn test_computed_column_is_dropped_even_when_present() {
        let mut schema = meta(vec![
            column("id", "int", false, None),
            column("full_name", "varchar", false, None),
        ]);
        schema.computed_columns.insert("full_name".to_string());
        let record = Record::from([
            ("id".to_string(), FieldValue::Int(1)),
            ("full_name".to_string(), FieldValue::Text("x".to_string())),
        ]);

        let projected = project(&record, &schema, SourceFormat::Json).unwrap();

        assert_eq!(projected, vec![("[id]".to_string(), FieldValue::Int(1))]);
    }

    #[test]
    fn test_computed_column_absent_is_not_a_validation_error() {
        // Computed columns are skipped before the presence check, even when
        // NOT NULL with no default.
        let mut schema = meta(vec![
            column("id", "int", false, None),
            column("full_name", "varchar", false, None),
        ]);
        schema.computed_columns.insert("full_name".to_string());
        let record = Record::from([("id".to_string(), FieldValue::Int(1))]);

        let projected = project(&record, &schema, SourceFormat::Json).unwrap();

        assert_eq!(projected, vec![("[id]".to_string(), FieldValue::Int(1))]);
    }

    #[test]
    fn test_timestamp_column_is_dropped_even_when_present() {
        let schema = meta(vec![
            column("id", "int", false, None),
            column("row_version", "timestamp", false, None),
        ]);
        let record = Record::from([
            ("id".to_string(), FieldValue::Int(1)),
            ("row_version".to_string(), FieldValue::Int(42)),
        ]);

        let projected = project(&record, &schema, SourceFormat::Json).unwrap();

        assert_eq!(projected, vec![("[id]".to_string(), FieldValue::Int(1))]);
    }

    #[test]
    fn test_empty_schema_projects_nothing() {
        let record = Record::from([("id".to_string(), FieldValue::Int(1))]);

        let projected = project(&record, &meta(Vec::new()), SourceFormat::Json).unwrap();

        assert!(projected.is_empty());
    }

    #[test]
    fn test_column_and_value_counts_match() {
        let schema = meta(vec![
            column("id", "int", false, None),
            column("name", "varchar", true, None),
            column("age", "int", true, None),
        ]);
        let record = Record::from([
            ("id".to_string(), FieldValue::Int(7)),
            ("name".to_string(), FieldValue::Text("Eve".to_string())),
            ("age".to_string(), FieldValue::Int(30)),
        ]);

        let projected = project(&record, &schema, SourceFormat::Json).unwrap();

        let columns: Vec<&String> = projected.iter().map(|(c, _)| c).collect();
        assert_eq!(columns, vec!["[id]", "[name]", "[age]"]);
        assert_eq!(projected.len(), 3);
    }
}
