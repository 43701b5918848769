//! SQLite catalog connection over rusqlite

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OpenFlags};

use super::{CatalogConnection, Row, SqlValue};

/// A SQLite database file opened read-only
pub struct SqliteConnection {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteConnection {
    /// Open an existing database file read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            anyhow::bail!("Database file not found: {}", path.display());
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open SQLite database: {}", path.display()))?;

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an already open connection, e.g. an in-memory database.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn, path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl CatalogConnection for SqliteConnection {
    fn current_database(&self) -> Result<String> {
        Ok("main".to_string())
    }

    fn query(&self, sql: &str, params: &[&str]) -> Result<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Rc<[String]> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();

        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(match row.get_ref(i)? {
                    ValueRef::Null => SqlValue::Null,
                    ValueRef::Integer(v) => SqlValue::Int(v),
                    ValueRef::Real(v) => SqlValue::Float(v),
                    ValueRef::Text(v) => SqlValue::Text(String::from_utf8_lossy(v).into_owned()),
                    ValueRef::Blob(v) => SqlValue::Bytes(v.to_vec()),
                });
            }
            result.push(Row::new(Rc::clone(&columns), values));
        }
        Ok(result)
    }

    fn source_file(&self) -> Option<&Path> {
        self.path()
    }
}
