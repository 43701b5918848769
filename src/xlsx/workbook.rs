//! In-memory workbook model and editing operations

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::error::DbDictError;
use crate::util::eq_ci;

use super::cell::{CellRange, CellRef, MAX_ROW};
use super::styles::{CellStyle, Styles};
use super::{reader, writer};

/// Value held by a cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub value: Option<CellValue>,
    /// Index into the workbook's cell formats
    pub style: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRow {
    /// Custom height in points
    pub height: Option<f64>,
    pub cells: BTreeMap<u32, Cell>,
}

/// Width of a run of columns
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnWidth {
    pub min: u32,
    pub max: u32,
    pub width: f64,
}

/// A link from a cell to a location inside the workbook
#[derive(Debug, Clone, PartialEq)]
pub struct Hyperlink {
    pub cell: CellRef,
    /// Target such as `'orders'!A1`
    pub location: String,
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    pub name: String,
    pub(super) rows: BTreeMap<u32, SheetRow>,
    pub(super) cols: Vec<ColumnWidth>,
    pub(super) merges: Vec<CellRange>,
    pub(super) hyperlinks: Vec<Hyperlink>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn cell(&self, at: CellRef) -> Option<&Cell> {
        self.rows.get(&at.row).and_then(|r| r.cells.get(&at.col))
    }

    fn cell_mut(&mut self, at: CellRef) -> &mut Cell {
        self.rows
            .entry(at.row)
            .or_default()
            .cells
            .entry(at.col)
            .or_default()
    }

    pub fn value(&self, at: CellRef) -> Option<&CellValue> {
        self.cell(at).and_then(|c| c.value.as_ref())
    }

    /// Text of a cell; numbers and booleans are not converted
    pub fn text(&self, at: CellRef) -> Option<&str> {
        match self.value(at) {
            Some(CellValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Set a cell's value, keeping its style
    pub fn set_value(&mut self, at: CellRef, value: impl Into<CellValue>) {
        self.cell_mut(at).value = Some(value.into());
    }

    /// Apply a cell format to every cell of `range`, creating empty cells as
    /// needed
    pub fn set_style(&mut self, range: CellRange, style: u32) {
        for at in range.cells() {
            self.cell_mut(at).style = style;
        }
    }

    /// Merge a range. Existing merges overlapping it are replaced.
    pub fn merge(&mut self, range: CellRange) {
        self.merges.retain(|m| !m.overlaps(&range));
        self.merges.push(range);
    }

    pub fn merges(&self) -> &[CellRange] {
        &self.merges
    }

    /// Link a cell to a location in the workbook, replacing any link it had
    pub fn set_hyperlink(&mut self, at: CellRef, location: impl Into<String>) {
        let display = self.text(at).map(str::to_string);
        self.hyperlinks.retain(|h| h.cell != at);
        self.hyperlinks.push(Hyperlink {
            cell: at,
            location: location.into(),
            display,
        });
    }

    pub fn hyperlink(&self, at: CellRef) -> Option<&Hyperlink> {
        self.hyperlinks.iter().find(|h| h.cell == at)
    }

    pub fn hyperlinks(&self) -> &[Hyperlink] {
        &self.hyperlinks
    }

    /// Insert `count` blank rows before row `at`.
    ///
    /// Rows from `at` down move by `count`, along with their merges and links.
    /// A merge spanning the insertion point grows.
    pub fn insert_rows(&mut self, at: u32, count: u32) -> Result<(), DbDictError> {
        if count == 0 {
            return Ok(());
        }
        if at == 0 || self.max_row().saturating_add(count) > MAX_ROW {
            return Err(DbDictError::Workbook {
                message: format!("cannot insert {} rows at row {} in {}", count, at, self.name),
            });
        }

        let moved = self.rows.split_off(&at);
        self.rows
            .extend(moved.into_iter().map(|(r, row)| (r + count, row)));

        for merge in &mut self.merges {
            if merge.start.row >= at {
                merge.start.row += count;
                merge.end.row += count;
            } else if merge.end.row >= at {
                merge.end.row += count;
            }
        }

        for link in &mut self.hyperlinks {
            if link.cell.row >= at {
                link.cell.row += count;
            }
        }

        Ok(())
    }

    /// Last row holding a cell, merge or link; 0 for an empty sheet
    pub fn max_row(&self) -> u32 {
        let rows = self.rows.keys().next_back().copied().unwrap_or(0);
        let merges = self.merges.iter().map(|m| m.end.row).max().unwrap_or(0);
        let links = self.hyperlinks.iter().map(|h| h.cell.row).max().unwrap_or(0);
        rows.max(merges).max(links)
    }

    /// Used range, e.g. `A1:K20`
    pub(super) fn dimension(&self) -> String {
        let max_col = self
            .rows
            .values()
            .filter_map(|r| r.cells.keys().next_back().copied())
            .chain(self.merges.iter().map(|m| m.end.col))
            .max()
            .unwrap_or(1);
        let max_row = self.max_row().max(1);
        CellRange::new(CellRef::new(1, 1), CellRef::new(max_col, max_row)).to_string()
    }
}

/// An Office Open XML workbook loaded into memory
#[derive(Debug, Clone)]
pub struct Workbook {
    pub(super) sheets: Vec<Worksheet>,
    pub(super) active: usize,
    pub(super) styles: Styles,
    path: Option<PathBuf>,
}

impl Workbook {
    pub(super) fn from_parts(sheets: Vec<Worksheet>, active: usize, styles: Styles) -> Self {
        let active = active.min(sheets.len().saturating_sub(1));
        Self {
            sheets,
            active,
            styles,
            path: None,
        }
    }

    /// Load a workbook from an `.xlsx` file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut workbook = reader::read_workbook(path)?;
        workbook.path = Some(path.to_path_buf());
        debug!(path = %path.display(), sheets = workbook.sheets.len(), "opened workbook");
        Ok(workbook)
    }

    /// Write the workbook back to the file it was opened from.
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_deref().ok_or_else(|| DbDictError::Workbook {
            message: "workbook has no file to save to".to_string(),
        })?;
        self.save_as(path)
    }

    pub fn save_as(&self, path: &Path) -> Result<()> {
        writer::write_workbook(self, path)?;
        debug!(path = %path.display(), sheets = self.sheets.len(), "saved workbook");
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Position of a sheet; names compare case-insensitively
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| eq_ci(&s.name, name))
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheet_index(name).map(|i| &self.sheets[i])
    }

    pub fn sheet_mut(&mut self, name: &str) -> Result<&mut Worksheet, DbDictError> {
        match self.sheet_index(name) {
            Some(i) => Ok(&mut self.sheets[i]),
            None => Err(DbDictError::SheetNotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Duplicate `source` into a new sheet appended at the end.
    ///
    /// Fails when `source` is missing or `new_name` is already taken.
    pub fn copy_sheet(&mut self, source: &str, new_name: &str) -> Result<usize, DbDictError> {
        if self.sheet_index(new_name).is_some() {
            return Err(DbDictError::DuplicateSheet {
                name: new_name.to_string(),
            });
        }
        let index = self
            .sheet_index(source)
            .ok_or_else(|| DbDictError::SheetNotFound {
                name: source.to_string(),
            })?;

        let mut copy = self.sheets[index].clone();
        copy.name = new_name.to_string();
        self.sheets.push(copy);
        Ok(self.sheets.len() - 1)
    }

    /// Remove a sheet. The last remaining sheet cannot be removed.
    pub fn delete_sheet(&mut self, name: &str) -> Result<(), DbDictError> {
        let index = self
            .sheet_index(name)
            .ok_or_else(|| DbDictError::SheetNotFound {
                name: name.to_string(),
            })?;
        if self.sheets.len() == 1 {
            return Err(DbDictError::Workbook {
                message: format!("cannot delete {}, the only sheet", name),
            });
        }

        self.sheets.remove(index);
        if self.active > index || self.active >= self.sheets.len() {
            self.active = self.active.saturating_sub(1);
        }
        Ok(())
    }

    /// Make a sheet the one shown when the file is opened
    pub fn set_active(&mut self, name: &str) -> Result<(), DbDictError> {
        self.active = self
            .sheet_index(name)
            .ok_or_else(|| DbDictError::SheetNotFound {
                name: name.to_string(),
            })?;
        Ok(())
    }

    pub fn active_sheet_name(&self) -> Option<&str> {
        self.sheets.get(self.active).map(|s| s.name.as_str())
    }

    /// Cell format index for `style`, added to the stylesheet on first use
    pub fn add_style(&mut self, style: CellStyle) -> u32 {
        self.styles.add(style)
    }
}
