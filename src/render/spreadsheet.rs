//! Excel dictionary built from the bundled template workbook
//!
//! The index page and every table page are copies of the template's scaffold
//! sheets. Rows are inserted below each anchor row to fit the data, so the
//! rows that follow (the index section of a table page) move down with it.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, warn};

use crate::error::DbDictError;
use crate::model::{DatabaseInfo, TableInfo};
use crate::util::{sheet_location, yes_no, SheetNames};
use crate::xlsx::template::{self, DATABASE_SHEET, TABLE_SHEET};
use crate::xlsx::{CellRange, CellRef, CellStyle, Workbook, Worksheet};

use super::{length_text, numeric_text, OutputFormat, OutputTarget, Progress, RenderUnit, Renderer};

/// Name of the index sheet
pub const HOME_SHEET: &str = "Home";

// Index sheet layout
const DB_NAME_ROW: u32 = 3;
const DB_COUNT_ROW: u32 = 5;
const DB_FIRST_TABLE_ROW: u32 = 8;

// Table sheet layout
const TABLE_TITLE_ROW: u32 = 1;
const TABLE_NAME_ROW: u32 = 3;
const TABLE_TYPE_ROW: u32 = 5;
const TABLE_COMMENT_ROW: u32 = 7;
const TABLE_FIRST_COLUMN_ROW: u32 = 10;
/// Rows between the last column row and the first index row
const INDEX_OFFSET: u32 = 2;

const COL_A: u32 = 1;
const COL_B: u32 = 2;
const COL_C: u32 = 3;
const COL_D: u32 = 4;
const COL_G: u32 = 7;
const COL_K: u32 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NotOpened,
    IndexRendered,
    /// Number of table pages rendered so far
    TablePage(usize),
    Finalized,
}

pub struct SpreadsheetRenderer {
    target: OutputTarget,
    path: PathBuf,
    workbook: Option<Workbook>,
    sheet_names: SheetNames,
    state: State,
}

impl SpreadsheetRenderer {
    pub fn new(target: OutputTarget) -> Self {
        let path = target.path(OutputFormat::Spreadsheet);
        Self {
            target,
            path,
            workbook: None,
            sheet_names: SheetNames::with_reserved([HOME_SHEET, DATABASE_SHEET, TABLE_SHEET]),
            state: State::NotOpened,
        }
    }

    fn workbook(&mut self) -> Result<&mut Workbook, DbDictError> {
        self.workbook.as_mut().ok_or_else(|| DbDictError::Workbook {
            message: "the index page must be rendered before table pages".to_string(),
        })
    }

    fn render_database(&mut self, database: &DatabaseInfo) -> Result<()> {
        if self.state != State::NotOpened {
            return Err(DbDictError::Workbook {
                message: "index page already rendered".to_string(),
            }
            .into());
        }

        self.target.claim(&self.path)?;
        template::write_template(&self.path)?;
        let mut workbook = Workbook::open(&self.path)?;

        workbook.copy_sheet(DATABASE_SHEET, HOME_SHEET)?;
        workbook.set_active(HOME_SHEET)?;
        let style = workbook.add_style(CellStyle::table_cell());
        fill_index_sheet(
            workbook.sheet_mut(HOME_SHEET)?,
            database,
            &mut self.sheet_names,
            style,
        )?;

        self.workbook = Some(workbook);
        self.state = State::IndexRendered;
        Ok(())
    }

    fn render_table(&mut self, table: &TableInfo) -> Result<()> {
        let pages = match self.state {
            State::IndexRendered => 0,
            State::TablePage(n) => n,
            State::NotOpened | State::Finalized => {
                return Err(DbDictError::Workbook {
                    message: format!("cannot render table {} in state {:?}", table.name, self.state),
                }
                .into());
            }
        };

        let sheet_name = self.sheet_names.assign(&table.name);
        let workbook = self.workbook()?;
        workbook.copy_sheet(TABLE_SHEET, &sheet_name)?;
        workbook.set_active(&sheet_name)?;
        let style = workbook.add_style(CellStyle::table_cell());
        fill_table_sheet(workbook.sheet_mut(&sheet_name)?, table, style)?;

        self.state = State::TablePage(pages + 1);
        Ok(())
    }

    /// Drop the scaffold sheets, show the index page first and save.
    fn finalize(&mut self) -> Result<()> {
        if self.state == State::Finalized {
            return Ok(());
        }
        self.state = State::Finalized;

        let Some(workbook) = self.workbook.as_mut() else {
            return Ok(());
        };
        for scaffold in [DATABASE_SHEET, TABLE_SHEET] {
            if workbook.sheet_index(scaffold).is_some() {
                workbook.delete_sheet(scaffold)?;
            }
        }
        if workbook.sheet_index(HOME_SHEET).is_some() {
            workbook.set_active(HOME_SHEET)?;
        }
        workbook.save()?;
        Ok(())
    }
}

impl Renderer for SpreadsheetRenderer {
    fn render(
        &mut self,
        unit: RenderUnit<'_>,
        progress: Progress,
        is_last: bool,
    ) -> Result<PathBuf> {
        let rendered = match unit {
            RenderUnit::Database(database) => self.render_database(database),
            RenderUnit::Table(table) => self.render_table(table),
        };

        if is_last {
            let finalized = self.finalize();
            match (&rendered, finalized) {
                (Err(_), Err(e)) => warn!(error = %e, "failed to finalize workbook"),
                (Ok(_), Err(e)) => return Err(e),
                (_, Ok(())) => {}
            }
        }
        rendered?;

        debug!(
            unit = unit.display_name(),
            %progress,
            state = ?self.state,
            path = %self.path.display(),
            "rendered spreadsheet"
        );
        Ok(self.path.clone())
    }
}

fn fill_index_sheet(
    sheet: &mut Worksheet,
    database: &DatabaseInfo,
    sheet_names: &mut SheetNames,
    style: u32,
) -> Result<()> {
    sheet.set_value(CellRef::new(COL_B, DB_NAME_ROW), database.database_name.as_str());
    sheet.set_value(
        CellRef::new(COL_B, DB_COUNT_ROW),
        format!(
            "{} / {}",
            database.selected_table_count(),
            database.table_count()
        ),
    );

    let tables: Vec<&TableInfo> = database.selected_tables().collect();
    if tables.is_empty() {
        return Ok(());
    }
    let count = tables.len() as u32;
    sheet.insert_rows(DB_FIRST_TABLE_ROW + 1, count - 1)?;

    for (row, table) in (DB_FIRST_TABLE_ROW..).zip(&tables) {
        let name_cell = CellRef::new(COL_B, row);
        sheet.set_value(name_cell, table.name.as_str());
        sheet.set_hyperlink(name_cell, sheet_location(&sheet_names.assign(&table.name)));
        sheet.set_value(CellRef::new(COL_C, row), table.table_type.as_str());
        sheet.set_value(CellRef::new(COL_D, row), table.comment.as_str());
    }

    sheet.set_style(
        CellRange::new(
            CellRef::new(COL_B, DB_FIRST_TABLE_ROW),
            CellRef::new(COL_D, DB_FIRST_TABLE_ROW + count - 1),
        ),
        style,
    );
    Ok(())
}

fn fill_table_sheet(sheet: &mut Worksheet, table: &TableInfo, style: u32) -> Result<()> {
    sheet.set_hyperlink(CellRef::new(COL_A, 1), sheet_location(HOME_SHEET));
    sheet.set_value(
        CellRef::new(COL_B, TABLE_TITLE_ROW),
        format!("{} / {}", table.database_name, table.name),
    );
    sheet.set_value(CellRef::new(COL_B, TABLE_NAME_ROW), table.name.as_str());
    sheet.set_value(CellRef::new(COL_B, TABLE_TYPE_ROW), table.table_type.as_str());
    sheet.set_value(CellRef::new(COL_B, TABLE_COMMENT_ROW), table.comment.as_str());

    // The template reserves one row per list
    let column_rows = (table.columns.len() as u32).max(1);
    sheet.insert_rows(TABLE_FIRST_COLUMN_ROW + 1, column_rows - 1)?;

    for (row, column) in (TABLE_FIRST_COLUMN_ROW..).zip(&table.columns) {
        let values = [
            column.name.clone(),
            column.data_type.clone(),
            length_text(column),
            numeric_text(column),
            yes_no(column.is_nullable).to_string(),
            column.default_value.clone().unwrap_or_default(),
            yes_no(column.is_primary).to_string(),
            yes_no(column.is_auto_increment).to_string(),
            yes_no(column.is_unique).to_string(),
            column.comment.clone(),
        ];
        for (col, value) in (COL_B..=COL_K).zip(values) {
            sheet.set_value(CellRef::new(col, row), value);
        }
    }
    if !table.columns.is_empty() {
        sheet.set_style(
            CellRange::new(
                CellRef::new(COL_B, TABLE_FIRST_COLUMN_ROW),
                CellRef::new(COL_K, TABLE_FIRST_COLUMN_ROW + column_rows - 1),
            ),
            style,
        );
    }

    if table.indexes.is_empty() {
        return Ok(());
    }
    let first_index_row = TABLE_FIRST_COLUMN_ROW + column_rows + INDEX_OFFSET;
    let index_rows = table.indexes.len() as u32;
    sheet.insert_rows(first_index_row + 1, index_rows - 1)?;

    for (row, index) in (first_index_row..).zip(&table.indexes) {
        sheet.set_value(CellRef::new(COL_B, row), index.name.as_str());
        sheet.set_value(CellRef::new(COL_C, row), index.columns_joined(", "));
        sheet.merge(CellRange::new(
            CellRef::new(COL_C, row),
            CellRef::new(COL_G, row),
        ));
        let flags = [
            index.index_type.clone(),
            yes_no(index.is_primary).to_string(),
            yes_no(index.is_unique).to_string(),
            index.comment.clone(),
        ];
        for (col, value) in (COL_G + 1..=COL_K).zip(flags) {
            sheet.set_value(CellRef::new(col, row), value);
        }
    }
    sheet.set_style(
        CellRange::new(
            CellRef::new(COL_B, first_index_row),
            CellRef::new(COL_K, first_index_row + index_rows - 1),
        ),
        style,
    );
    Ok(())
}
