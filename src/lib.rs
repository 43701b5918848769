//! db-dict: database dictionary generator
//!
//! This library reads the schema of a MySQL, PostgreSQL, SQL Server, Oracle
//! or SQLite database through its catalog and writes a cross-linked
//! dictionary of every table, column and index as a Markdown document or an
//! Excel workbook.

pub mod catalog;
pub mod dictionary;
pub mod error;
pub mod introspect;
pub mod model;
pub mod render;
pub mod util;
pub mod xlsx;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

pub use catalog::{MetadataKind, Vendor};
pub use dictionary::{build_all, build_all_with_progress, BuildOptions};
pub use error::DbDictError;
pub use introspect::{CatalogConnection, SqliteConnection};
pub use model::DatabaseInfo;
pub use render::{OutputFormat, Progress};

/// Options for generating a dictionary
#[derive(Debug, Clone)]
pub struct DictOptions {
    /// Database vendor the connection talks to
    pub vendor: Vendor,
    /// Database (or schema / owner) to document; defaults to the
    /// connection's current database
    pub database: Option<String>,
    /// File of a self-contained local database, used to name the output
    pub source_file: Option<PathBuf>,
    /// Tables to document; `None` documents every table
    pub tables: Option<Vec<String>>,
    /// Directory the document is written to
    pub output_dir: PathBuf,
    /// Markdown or spreadsheet
    pub format: OutputFormat,
    /// Replace an existing document
    pub overwrite: bool,
}

/// Introspect a database and write its dictionary
pub fn generate_dictionary(
    conn: &dyn CatalogConnection,
    options: &DictOptions,
) -> Result<Vec<PathBuf>> {
    // Step 1: Resolve the database to document
    let database_name = match &options.database {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => conn.current_database()?,
    };

    info!(vendor = %options.vendor, database = %database_name, "reading catalog");

    // Step 2: Read the catalog
    let (table_names, raw) = introspect::introspect(conn, options.vendor, &database_name)?;

    debug!(
        tables = table_names.len(),
        columns = raw.columns.len(),
        indexes = raw.indexes.len(),
        "catalog read"
    );

    // Step 3: Build the database model
    let mut database = model::build_database(&database_name, &table_names, &raw);

    // Step 4: Apply the table selection
    if let Some(tables) = &options.tables {
        database.set_selected_table_names(tables);
    }

    debug!(
        selected = database.selected_table_count(),
        total = database.table_count(),
        "built database model"
    );

    // Step 5: Render
    let source_file = options.source_file.clone().or_else(|| {
        options
            .vendor
            .is_file_based()
            .then(|| conn.source_file().map(|p| p.to_path_buf()))
            .flatten()
    });
    let build = BuildOptions {
        output_dir: options.output_dir.clone(),
        format: options.format,
        overwrite: options.overwrite,
        source_file,
    };
    let paths = dictionary::build_all(&database, &build)?;

    for path in &paths {
        info!(path = %path.display(), "wrote dictionary");
    }

    Ok(paths)
}
