//! Common test utilities for db-dict tests

#![allow(dead_code)]

use std::path::PathBuf;

use db_dict::model::{ColumnInfo, DatabaseInfo, IndexInfo, TableInfo, TableType};
use db_dict::{DictOptions, OutputFormat, SqliteConnection, Vendor};
use rusqlite::Connection;
use tempfile::TempDir;

/// A small shop schema with a table, a view, comments-free columns and
/// indexes of every kind SQLite reports
pub const SHOP_SCHEMA: &str = r#"
CREATE TABLE customers (
    id INTEGER PRIMARY KEY,
    email VARCHAR(120) NOT NULL UNIQUE,
    name TEXT
);
CREATE TABLE orders (
    id INTEGER PRIMARY KEY,
    customer_id INTEGER NOT NULL REFERENCES customers (id),
    total DECIMAL(10,2) DEFAULT 0,
    placed_at DATETIME
);
CREATE INDEX ix_orders_customer ON orders (customer_id, placed_at);
CREATE VIEW order_totals AS
    SELECT customer_id, SUM(total) AS total FROM orders GROUP BY customer_id;
"#;

/// Test context with temporary directories for the database file and output
pub struct TestContext {
    /// Kept to prevent temp directory cleanup until TestContext is dropped
    _temp_dir: TempDir,
    pub db_path: PathBuf,
    pub output_dir: PathBuf,
}

impl TestContext {
    /// Create a SQLite database file from `schema`
    pub fn with_schema(schema: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("shop.sqlite3");
        let output_dir = temp_dir.path().join("out");

        let conn = Connection::open(&db_path).expect("Failed to create database");
        conn.execute_batch(schema).expect("Failed to apply schema");
        drop(conn);

        Self {
            _temp_dir: temp_dir,
            db_path,
            output_dir,
        }
    }

    pub fn shop() -> Self {
        Self::with_schema(SHOP_SCHEMA)
    }

    pub fn connect(&self) -> SqliteConnection {
        SqliteConnection::open(&self.db_path).expect("Failed to open database")
    }

    pub fn options(&self, format: OutputFormat) -> DictOptions {
        DictOptions {
            vendor: Vendor::Sqlite,
            database: None,
            source_file: Some(self.db_path.clone()),
            tables: None,
            output_dir: self.output_dir.clone(),
            format,
            overwrite: false,
        }
    }

    /// Generate with the given options, panicking on failure
    pub fn generate(&self, options: &DictOptions) -> Vec<PathBuf> {
        let conn = self.connect();
        db_dict::generate_dictionary(&conn, options).expect("Generation failed")
    }
}

/// The synthetic single-table database: `t1 (id, name)` with index `idx_name`
pub fn t1_database() -> DatabaseInfo {
    let column = |ordinal: i64, name: &str, data_type: &str| ColumnInfo {
        ordinal,
        database_name: "demo".to_string(),
        table_name: "t1".to_string(),
        name: name.to_string(),
        data_type: data_type.to_string(),
        ..Default::default()
    };

    let mut id = column(1, "id", "integer");
    id.is_primary = true;
    id.is_auto_increment = true;
    let mut name = column(2, "name", "text");
    name.is_nullable = true;

    let mut db = DatabaseInfo::new("demo");
    db.add_table(TableInfo {
        database_name: "demo".to_string(),
        name: "t1".to_string(),
        table_type: TableType::Table,
        comment: String::new(),
        columns: vec![id, name],
        indexes: vec![IndexInfo {
            database_name: "demo".to_string(),
            table_name: "t1".to_string(),
            name: "idx_name".to_string(),
            column_names: vec!["name".to_string()],
            index_type: "index".to_string(),
            ..Default::default()
        }],
    });
    db
}

/// A database with `count` one-column tables named `t1`..`tN`
pub fn numbered_database(count: usize) -> DatabaseInfo {
    let mut db = DatabaseInfo::new("demo");
    for i in 1..=count {
        let name = format!("t{}", i);
        db.add_table(TableInfo {
            database_name: "demo".to_string(),
            name: name.clone(),
            table_type: TableType::Table,
            comment: String::new(),
            columns: vec![ColumnInfo {
                ordinal: 1,
                table_name: name.clone(),
                name: "id".to_string(),
                data_type: "int".to_string(),
                ..Default::default()
            }],
            indexes: vec![],
        });
    }
    db
}
