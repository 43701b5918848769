//! Minimal Office Open XML workbook engine
//!
//! An `.xlsx` file is a ZIP package of XML parts. [`Workbook`] loads the
//! parts the dictionary needs (sheets, cell values and formats, merges,
//! in-workbook hyperlinks, column widths, the stylesheet) into memory,
//! supports the editing operations the spreadsheet renderer uses and writes
//! the package back out. Strings are always written inline.

mod cell;
mod reader;
mod styles;
pub mod template;
mod workbook;
mod writer;

pub use cell::{column_index, column_name, CellRange, CellRef};
pub use styles::CellStyle;
pub use workbook::{Cell, CellValue, Hyperlink, Workbook, Worksheet};

pub(crate) const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
pub(crate) const REL_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
