use std::path::Path;

use log::info;

use crate::db::{fetch_table_meta, DbClient};
use crate::errors::LoadError;
use crate::models::record::{FieldValue, Record, SourceFormat};
use crate::project::project;
use crate::reader::{read_csv, read_json};
use crate::sql::build_insert;

/// Splits `<prefix>_<table>.<ext>` into the target table name and format.
///
/// The prefix ends at the first underscore. The extension is the final
/// dot-segment; when the remainder holds more than one segment they are
/// rejoined with no separator to form the table name, so
/// `001_customer.orders.json` targets `customerorders`.
pub fn parse_file_name(file_name: &str) -> Result<(String, SourceFormat), LoadError> {
    let (_, rest) = file_name.split_once('_').ok_or_else(|| {
        LoadError::Format(format!("no table name in file name {}", file_name))
    })?;

    let segments: Vec<&str> = rest.split('.').collect();
    if segments.len() < 2 {
        return Err(LoadError::Format(format!(
            "no extension in file name {}",
            file_name
        )));
    }

    let format = SourceFormat::from_extension(segments[segments.len() - 1])?;
    let table_name = segments[..segments.len() - 1].concat();
    Ok((table_name, format))
}

fn read_records(data: &[u8], format: SourceFormat) -> Result<Vec<Record>, LoadError> {
    match format {
        SourceFormat::Json => read_json(data),
        SourceFormat::Csv => read_csv(data),
    }
}

/// Loads every file in `dir` into its table, in filename order.
///
/// One file at a time, one row at a time, one round trip per row; each
/// INSERT auto-commits, so rows executed before a failure stay applied.
/// The first error of any kind ends the run.
pub async fn run(db: &dyn DbClient, dir: &Path) -> Result<(), LoadError> {
    let mut file_names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        file_names.push(entry.file_name().to_string_lossy().into_owned());
    }
    file_names.sort();

    for file_name in &file_names {
        let (table_name, format) = parse_file_name(file_name)?;
        let meta = fetch_table_meta(db, &table_name).await?;

        let data = tokio::fs::read(dir.join(file_name)).await?;
        let records = read_records(&data, format)?;
        info!(
            "loading {} record(s) from {} into {}",
            records.len(),
            file_name,
            table_name
        );

        for record in &records {
            let projected = project(record, &meta, format)?;
            if projected.is_empty() {
                // Run-level short circuit: an empty projection ends the
                // whole run, it does not skip to the next row.
                info!("no data to insert");
                return Ok(());
            }

            let sql = build_insert(&table_name, &projected, meta.is_identity);
            let values: Vec<FieldValue> = projected.into_iter().map(|(_, value)| value).collect();
            info!("query {}", sql);
            db.execute(&sql, &values).await?;
        }
    }

    info!("upload done");
    Ok(())
}
