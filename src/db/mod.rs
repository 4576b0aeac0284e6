use std::collections::HashSet;

use async_trait::async_trait;

use crate::errors::LoadError;
use crate::models::record::FieldValue;
use crate::models::schema::{ColumnSchema, TableMeta};

pub mod mssql;

/// Database operations the loader depends on. One concrete implementation
/// talks TDS to SQL Server; tests substitute a mock.
#[async_trait]
pub trait DbClient {
    /// Column definitions from the information schema, in result order.
    /// A table with no columns yields an empty vec, not an error.
    async fn table_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, LoadError>;
    /// Whether the table has at least one identity column.
    async fn has_identity_column(&self, table_name: &str) -> Result<bool, LoadError>;
    /// Names of server-computed columns.
    async fn computed_columns(&self, table_name: &str) -> Result<HashSet<String>, LoadError>;
    /// Executes one statement with positional parameters.
    async fn execute(&self, sql: &str, params: &[FieldValue]) -> Result<(), LoadError>;
}

/// Fetches the full metadata for one table: columns, identity flag, computed
/// columns. Called once per table, immediately before its files are loaded.
pub async fn fetch_table_meta(db: &dyn DbClient, table_name: &str) -> Result<TableMeta, LoadError> {
    let columns = db.table_columns(table_name).await?;
    let is_identity = db.has_identity_column(table_name).await?;
    let computed_columns = db.computed_columns(table_name).await?;

    Ok(TableMeta {
        table_name: table_name.to_string(),
        columns,
        is_identity,
        computed_columns,
    })
}
