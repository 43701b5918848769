//! Dialect introspection adapter
//!
//! Runs catalog queries against an open connection, binds the vendor's
//! parameters and decodes the result rows into vendor-neutral records.

mod decode;
mod sqlite;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use anyhow::Result;
use tracing::debug;

use crate::catalog::{MetadataKind, Vendor};
use crate::error::DbDictError;
use crate::model::{ColumnInfo, IndexInfo, RawCatalog};

pub use sqlite::SqliteConnection;

/// A single value returned by a catalog query
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Text form of the value; `None` for NULL.
    pub fn as_text(&self) -> Option<String> {
        match self {
            SqlValue::Null => None,
            SqlValue::Int(v) => Some(v.to_string()),
            SqlValue::Float(v) => Some(v.to_string()),
            SqlValue::Bool(v) => Some(if *v { "1" } else { "0" }.to_string()),
            SqlValue::Text(v) => Some(v.clone()),
            SqlValue::Bytes(v) => Some(String::from_utf8_lossy(v).into_owned()),
        }
    }

    /// Integer form of the value; `None` for NULL or non-numeric text.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SqlValue::Int(v) => Some(*v),
            SqlValue::Float(v) => Some(*v as i64),
            SqlValue::Bool(v) => Some(i64::from(*v)),
            SqlValue::Text(v) => {
                let v = v.trim();
                v.parse::<i64>()
                    .ok()
                    .or_else(|| v.parse::<f64>().ok().map(|f| f as i64))
            }
            SqlValue::Null | SqlValue::Bytes(_) => None,
        }
    }

    /// Boolean form of the value.
    ///
    /// Vendors report flags as integers, booleans or strings such as `YES`,
    /// `Y` and `t`; all of those are accepted.
    pub fn as_flag(&self) -> bool {
        match self {
            SqlValue::Bool(v) => *v,
            SqlValue::Int(v) => *v != 0,
            SqlValue::Float(v) => *v != 0.0,
            SqlValue::Text(v) => matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "y" | "yes" | "t" | "true"
            ),
            SqlValue::Null | SqlValue::Bytes(_) => false,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text().unwrap_or_default())
    }
}

/// One result row, addressed by column alias
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Rc<[String]>,
    values: Vec<SqlValue>,
}

impl Row {
    pub fn new(columns: Rc<[String]>, values: Vec<SqlValue>) -> Self {
        Self { columns, values }
    }

    /// Value of a column, matched case-insensitively
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .and_then(|i| self.values.get(i))
    }

    /// Text of a column; empty for NULL or a missing column
    pub fn text(&self, column: &str) -> String {
        self.opt_text(column).unwrap_or_default()
    }

    pub fn opt_text(&self, column: &str) -> Option<String> {
        self.get(column).and_then(SqlValue::as_text)
    }

    pub fn int(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(SqlValue::as_int)
    }

    pub fn flag(&self, column: &str) -> bool {
        self.get(column).map(SqlValue::as_flag).unwrap_or(false)
    }
}

/// An open, read-only handle on a database catalog.
///
/// Implementations execute the vendor's SQL with positional parameters bound
/// in order and return every row; they need not be `Send`.
pub trait CatalogConnection {
    /// Name of the database (or schema) the handle is connected to
    fn current_database(&self) -> Result<String>;

    /// Run a query, binding `params` to its placeholders in order
    fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<Row>>;

    /// Source file of a self-contained local database, if any
    fn source_file(&self) -> Option<&Path> {
        None
    }
}

/// Execute the catalog query for `kind`, or return no rows when the vendor
/// does not support it.
fn run(
    conn: &dyn CatalogConnection,
    vendor: Vendor,
    kind: MetadataKind,
    database: &str,
    table: Option<&str>,
) -> Result<Vec<Row>> {
    let Some(query) = vendor.query(kind) else {
        debug!(%vendor, %kind, "no catalog query, skipping");
        return Ok(Vec::new());
    };

    let params = query.params(database, table);
    let rows = conn
        .query(query.sql, &params)
        .map_err(|e| DbDictError::CatalogQuery {
            vendor,
            kind,
            message: format!("{:#}", e),
        })?;

    debug!(%vendor, %kind, rows = rows.len(), "catalog query");
    Ok(rows)
}

/// Names of every table and view in `database`, in catalog order.
pub fn list_tables(
    conn: &dyn CatalogConnection,
    vendor: Vendor,
    database: &str,
) -> Result<Vec<String>> {
    let rows = run(conn, vendor, MetadataKind::TableNames, database, None)?;
    let mut names: Vec<String> = Vec::with_capacity(rows.len());
    for name in rows.iter().map(|r| r.text("table_name")) {
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    Ok(names)
}

/// Table name to `table` / `view` / vendor-specific tag
pub fn fetch_table_types(
    conn: &dyn CatalogConnection,
    vendor: Vendor,
    database: &str,
) -> Result<HashMap<String, String>> {
    let rows = run(conn, vendor, MetadataKind::TableTypes, database, None)?;
    Ok(pairs(&rows, "table_name", "table_type"))
}

/// Column metadata for every table
pub fn fetch_columns(
    conn: &dyn CatalogConnection,
    vendor: Vendor,
    database: &str,
) -> Result<Vec<ColumnInfo>> {
    let rows = run(conn, vendor, MetadataKind::Columns, database, None)?;
    Ok(rows.iter().map(decode::column).collect())
}

/// Index metadata for every table
pub fn fetch_indexes(
    conn: &dyn CatalogConnection,
    vendor: Vendor,
    database: &str,
) -> Result<Vec<IndexInfo>> {
    let rows = run(conn, vendor, MetadataKind::Indexes, database, None)?;
    Ok(rows.iter().map(decode::index).collect())
}

/// Table name to comment; empty when the vendor keeps no table comments
pub fn fetch_table_comments(
    conn: &dyn CatalogConnection,
    vendor: Vendor,
    database: &str,
) -> Result<HashMap<String, String>> {
    let rows = run(conn, vendor, MetadataKind::TableComments, database, None)?;
    Ok(pairs(&rows, "table_name", "comment"))
}

/// Column name to comment for one table
pub fn fetch_column_comments(
    conn: &dyn CatalogConnection,
    vendor: Vendor,
    database: &str,
    table: &str,
) -> Result<HashMap<String, String>> {
    let rows = run(
        conn,
        vendor,
        MetadataKind::ColumnComments,
        database,
        Some(table),
    )?;
    Ok(pairs(&rows, "column_name", "comment"))
}

fn pairs(rows: &[Row], key: &str, value: &str) -> HashMap<String, String> {
    rows.iter()
        .map(|r| (r.text(key), r.text(value)))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

/// Fetch everything the aggregator needs for `database`.
///
/// Returns the known table names alongside the raw per-kind results. Vendors
/// whose bulk column query cannot carry comments have them looked up per
/// table, only for tables that still have an empty comment.
pub fn introspect(
    conn: &dyn CatalogConnection,
    vendor: Vendor,
    database: &str,
) -> Result<(Vec<String>, RawCatalog)> {
    let table_names = list_tables(conn, vendor, database)?;
    let table_types = fetch_table_types(conn, vendor, database)?;
    let mut columns = fetch_columns(conn, vendor, database)?;
    let indexes = fetch_indexes(conn, vendor, database)?;
    let table_comments = fetch_table_comments(conn, vendor, database)?;

    if !vendor.bulk_column_comments() && vendor.query(MetadataKind::ColumnComments).is_some() {
        fill_column_comments(conn, vendor, database, &table_names, &mut columns)?;
    }

    debug!(
        %vendor,
        database,
        tables = table_names.len(),
        columns = columns.len(),
        indexes = indexes.len(),
        "introspected catalog"
    );

    Ok((
        table_names,
        RawCatalog {
            table_types,
            columns,
            indexes,
            table_comments,
        },
    ))
}

fn fill_column_comments(
    conn: &dyn CatalogConnection,
    vendor: Vendor,
    database: &str,
    table_names: &[String],
    columns: &mut [ColumnInfo],
) -> Result<()> {
    for table in table_names {
        let missing = columns
            .iter()
            .any(|c| c.table_name == *table && c.comment.is_empty());
        if !missing {
            continue;
        }

        let comments = fetch_column_comments(conn, vendor, database, table)?;
        if comments.is_empty() {
            continue;
        }
        for column in columns
            .iter_mut()
            .filter(|c| c.table_name == *table && c.comment.is_empty())
        {
            if let Some(comment) = comments.get(&column.name) {
                column.comment = comment.clone();
            }
        }
    }
    Ok(())
}
