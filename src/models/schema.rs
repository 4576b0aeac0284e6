use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    /// Default expression text; only its presence matters to projection.
    pub default: Option<String>,
}

impl ColumnSchema {
    /// True when the database can fill the column by itself (NULL or default).
    pub fn has_fallback(&self) -> bool {
        self.is_nullable || self.default.is_some()
    }
}

/// Everything the loader needs to know about one target table.
///
/// Fetched fresh per table per run, never cached. The identity flag and the
/// computed-column set come from separate catalog views and are orthogonal to
/// `columns`: a computed column may or may not be listed there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMeta {
    pub table_name: String,
    /// Result order of the metadata query; names are unique within a table.
    pub columns: Vec<ColumnSchema>,
    pub is_identity: bool,
    pub computed_columns: HashSet<String>,
}
