//! The bundled dictionary workbook template
//!
//! Holds two scaffold sheets that the spreadsheet renderer duplicates: one
//! for the database index page and one for a table page.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::DbDictError;

/// Scaffold sheet for the index page
pub const DATABASE_SHEET: &str = "template-database";
/// Scaffold sheet for a table page
pub const TABLE_SHEET: &str = "template-table";

const PARTS: [(&str, &str); 7] = [
    (
        "[Content_Types].xml",
        include_str!("../../templates/xlsx/[Content_Types].xml"),
    ),
    ("_rels/.rels", include_str!("../../templates/xlsx/_rels/.rels")),
    (
        "xl/workbook.xml",
        include_str!("../../templates/xlsx/xl/workbook.xml"),
    ),
    (
        "xl/_rels/workbook.xml.rels",
        include_str!("../../templates/xlsx/xl/_rels/workbook.xml.rels"),
    ),
    (
        "xl/styles.xml",
        include_str!("../../templates/xlsx/xl/styles.xml"),
    ),
    (
        "xl/worksheets/sheet1.xml",
        include_str!("../../templates/xlsx/xl/worksheets/sheet1.xml"),
    ),
    (
        "xl/worksheets/sheet2.xml",
        include_str!("../../templates/xlsx/xl/worksheets/sheet2.xml"),
    ),
];

/// Write the template workbook to `path`, replacing any file there.
pub fn write_template(path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| DbDictError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut zip = ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in PARTS {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}
