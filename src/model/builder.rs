//! Aggregate raw catalog results into a [`DatabaseInfo`]

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::DbDictError;

use super::{ColumnInfo, DatabaseInfo, IndexInfo, TableInfo, TableType};

/// The raw, per-kind results of introspecting one database.
///
/// Columns and indexes are flat lists across all tables, each record tagged
/// with its owning table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCatalog {
    /// Table name to type tag
    pub table_types: HashMap<String, String>,
    pub columns: Vec<ColumnInfo>,
    pub indexes: Vec<IndexInfo>,
    /// Table name to comment; empty when the vendor has no table comments
    pub table_comments: HashMap<String, String>,
}

/// Build the database model for `table_names` from the raw catalog results.
///
/// Tables without any discoverable column are skipped with a warning; the
/// rest of the database is still built.
pub fn build_database(
    database_name: &str,
    table_names: &[String],
    raw: &RawCatalog,
) -> DatabaseInfo {
    let mut columns_by_table: HashMap<&str, Vec<&ColumnInfo>> = HashMap::new();
    for column in &raw.columns {
        columns_by_table
            .entry(column.table_name.as_str())
            .or_default()
            .push(column);
    }

    let mut indexes_by_table: HashMap<&str, Vec<&IndexInfo>> = HashMap::new();
    for index in &raw.indexes {
        indexes_by_table
            .entry(index.table_name.as_str())
            .or_default()
            .push(index);
    }

    let mut database = DatabaseInfo::new(database_name);
    for table_name in table_names {
        let columns = columns_by_table
            .get(table_name.as_str())
            .map(|v| v.as_slice())
            .unwrap_or_default();
        let indexes = indexes_by_table
            .get(table_name.as_str())
            .map(|v| v.as_slice())
            .unwrap_or_default();

        match build_table(database_name, table_name, raw, columns, indexes) {
            Ok(table) => database.add_table(table),
            Err(e) => warn!(table = %table_name, error = %e, "skipping table"),
        }
    }

    debug!(
        database = database_name,
        tables = database.table_count(),
        requested = table_names.len(),
        "built database model"
    );

    database
}

fn build_table(
    database_name: &str,
    table_name: &str,
    raw: &RawCatalog,
    columns: &[&ColumnInfo],
    indexes: &[&IndexInfo],
) -> Result<TableInfo, DbDictError> {
    if columns.is_empty() {
        return Err(DbDictError::NoColumns {
            table: table_name.to_string(),
        });
    }

    let table_type = raw
        .table_types
        .get(table_name)
        .map(|tag| TableType::from_tag(tag))
        .unwrap_or_else(|| TableType::Other(TableType::OTHER.to_string()));

    // A table name seen in several schemas keeps the first one in catalog order
    let schema = columns[0].schema_name.as_str();
    let same_schema = |other: &str| schema.is_empty() || other.is_empty() || other == schema;
    if columns.iter().any(|c| !same_schema(&c.schema_name)) {
        warn!(table = table_name, schema, "table found in several schemas, keeping one");
    }

    let mut columns: Vec<ColumnInfo> = columns
        .iter()
        .filter(|c| same_schema(&c.schema_name))
        .map(|c| (*c).clone())
        .collect();
    columns.sort_by_key(|c| c.ordinal);
    columns.dedup_by(|a, b| a.name == b.name);

    let mut seen = Vec::new();
    let indexes: Vec<IndexInfo> = indexes
        .iter()
        .filter(|i| same_schema(&i.schema_name))
        .filter(|i| {
            if seen.contains(&i.name.as_str()) {
                false
            } else {
                seen.push(i.name.as_str());
                true
            }
        })
        .map(|i| (*i).clone())
        .collect();

    Ok(TableInfo {
        database_name: database_name.to_string(),
        name: table_name.to_string(),
        table_type,
        comment: raw
            .table_comments
            .get(table_name)
            .cloned()
            .unwrap_or_default(),
        columns,
        indexes,
    })
}
