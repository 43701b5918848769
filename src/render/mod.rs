//! Rendering engine
//!
//! Turns the schema model into documentation files. A run renders one
//! [`RenderUnit::Database`] index followed by one [`RenderUnit::Table`] per
//! selected table; every call carries its [`Progress`] and whether it is the
//! last unit of the run.

mod markdown;
mod spreadsheet;
mod template;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;

use crate::error::DbDictError;
use crate::model::{ColumnInfo, DatabaseInfo, TableInfo};
use crate::util::sanitize_file_name;

pub use markdown::MarkdownRenderer;
pub use spreadsheet::{SpreadsheetRenderer, HOME_SHEET};
pub use template::fill_template;

/// Kind of document produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Markdown,
    Spreadsheet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Spreadsheet => "xlsx",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Markdown => f.write_str("markdown"),
            OutputFormat::Spreadsheet => f.write_str("spreadsheet"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DbDictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "xlsx" | "spreadsheet" => Ok(OutputFormat::Spreadsheet),
            _ => Err(DbDictError::UnsupportedFormat {
                name: s.to_string(),
            }),
        }
    }
}

/// One piece of work for a renderer
#[derive(Debug, Clone, Copy)]
pub enum RenderUnit<'a> {
    /// The index page listing the selected tables
    Database(&'a DatabaseInfo),
    /// The page for a single table
    Table(&'a TableInfo),
}

impl RenderUnit<'_> {
    pub fn display_name(&self) -> &str {
        match self {
            RenderUnit::Database(db) => &db.database_name,
            RenderUnit::Table(table) => &table.name,
        }
    }

    pub fn owner_database_name(&self) -> &str {
        match self {
            RenderUnit::Database(db) => &db.database_name,
            RenderUnit::Table(table) => &table.database_name,
        }
    }
}

/// Position of a unit within a run, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_last(&self) -> bool {
        self.current == self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.total)
    }
}

/// Where a run writes its document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub dir: PathBuf,
    /// File name without extension, already sanitized
    pub base_name: String,
    /// Replace an existing document instead of failing
    pub overwrite: bool,
}

impl OutputTarget {
    /// Target named after the database, or after the source file for
    /// self-contained local databases.
    pub fn new(
        dir: impl Into<PathBuf>,
        database_name: &str,
        source_file: Option<&Path>,
        overwrite: bool,
    ) -> Self {
        let stem = source_file
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty());
        Self {
            dir: dir.into(),
            base_name: sanitize_file_name(stem.unwrap_or(database_name)),
            overwrite,
        }
    }

    pub fn path(&self, format: OutputFormat) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.base_name, format.extension()))
    }

    /// Apply the overwrite rule to `path` before anything is written:
    /// fail when it exists and overwriting is off, remove it otherwise.
    pub(crate) fn claim(&self, path: &Path) -> Result<()> {
        if path.exists() {
            if !self.overwrite {
                return Err(DbDictError::DestinationExists {
                    path: path.to_path_buf(),
                }
                .into());
            }
            std::fs::remove_file(path).map_err(|e| DbDictError::OutputWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| DbDictError::OutputWrite {
            path: self.dir.clone(),
            source: e,
        })?;
        Ok(())
    }
}

/// A format-specific document writer.
///
/// A renderer is driven through one run: the database unit first, then each
/// table. `is_last` marks the final unit, after which the document is
/// complete on disk.
pub trait Renderer {
    /// Render one unit and return the path of the file it went to.
    fn render(&mut self, unit: RenderUnit<'_>, progress: Progress, is_last: bool)
        -> Result<PathBuf>;
}

/// Renderer for `format` writing to `target`
pub fn renderer_for(format: OutputFormat, target: OutputTarget) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Markdown => Box::new(MarkdownRenderer::new(target)),
        OutputFormat::Spreadsheet => Box::new(SpreadsheetRenderer::new(target)),
    }
}

/// Length column text; empty when the catalog has none
pub(crate) fn length_text(column: &ColumnInfo) -> String {
    column.length.map(|v| v.to_string()).unwrap_or_default()
}

/// `precision, scale, radix`, with `-` for a missing part; empty when all
/// three are missing
pub(crate) fn numeric_text(column: &ColumnInfo) -> String {
    let parts = [column.precision, column.scale, column.radix];
    if parts.iter().all(Option::is_none) {
        return String::new();
    }
    parts
        .iter()
        .map(|p| p.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}
