use crate::models::record::FieldValue;

/// Builds a parameterized INSERT for one projected row.
///
/// Placeholders are positional (`@p1`, `@p2`, …) and line up with the
/// projected column order. Identity tables get the session-scoped
/// `IDENTITY_INSERT` toggle wrapped immediately around the statement, since
/// SQL Server otherwise rejects explicit identity values. Table names come
/// from trusted filenames; values always travel as bound parameters.
pub fn build_insert(
    table_name: &str,
    projected: &[(String, FieldValue)],
    is_identity: bool,
) -> String {
    let columns = projected
        .iter()
        .map(|(col, _)| col.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=projected.len())
        .map(|i| format!("@p{}", i))
        .collect::<Vec<_>>()
        .join(", ");

    let insert = format!(
        "INSERT INTO {} ({}) VALUES ({});",
        table_name, columns, placeholders
    );
    if is_identity {
        format!(
            "SET IDENTITY_INSERT {} ON;{}SET IDENTITY_INSERT {} OFF;",
            table_name, insert, table_name
        )
    } else {
        insert
    }
}
