//! Write a [`Workbook`] as an `.xlsx` package

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::DbDictError;

use super::workbook::{CellValue, Workbook, Worksheet};
use super::{MAIN_NS, REL_NS};

const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const PACKAGE_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const CORE_PROPERTIES_REL: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const STYLES_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

const WORKBOOK_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const WORKSHEET_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const STYLES_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
const CORE_TYPE: &str = "application/vnd.openxmlformats-package.core-properties+xml";

/// Write every part of `workbook` into a new package at `path`.
pub(super) fn write_workbook(workbook: &Workbook, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DbDictError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    let file = File::create(path).map_err(|e| DbDictError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(1));

    let sheet_count = workbook.sheets.len();

    let mut buffer = Cursor::new(Vec::with_capacity(2048));
    write_content_types(&mut buffer, sheet_count)?;
    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(buffer.get_ref())?;

    let mut buffer = Cursor::new(Vec::with_capacity(1024));
    write_root_relationships(&mut buffer)?;
    zip.start_file("_rels/.rels", options)?;
    zip.write_all(buffer.get_ref())?;

    let mut buffer = Cursor::new(Vec::with_capacity(1024));
    write_core_properties(&mut buffer)?;
    zip.start_file("docProps/core.xml", options)?;
    zip.write_all(buffer.get_ref())?;

    let mut buffer = Cursor::new(Vec::with_capacity(2048));
    write_workbook_part(&mut buffer, workbook)?;
    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(buffer.get_ref())?;

    let mut buffer = Cursor::new(Vec::with_capacity(2048));
    write_workbook_relationships(&mut buffer, sheet_count)?;
    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(buffer.get_ref())?;

    let mut buffer = Cursor::new(Vec::with_capacity(4096));
    workbook.styles.write(&mut buffer)?;
    zip.start_file("xl/styles.xml", options)?;
    zip.write_all(buffer.get_ref())?;

    for (i, sheet) in workbook.sheets.iter().enumerate() {
        let mut buffer = Cursor::new(Vec::with_capacity(16 * 1024));
        write_worksheet(&mut buffer, sheet, i == workbook.active)?;
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)?;
        zip.write_all(buffer.get_ref())?;
    }

    zip.finish()?;
    Ok(())
}

fn start_document<W: Write>(out: W) -> Result<Writer<W>> {
    let mut writer = Writer::new(out);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(writer)
}

fn write_content_types<W: Write>(out: W, sheet_count: usize) -> Result<()> {
    let mut writer = start_document(out)?;

    let mut root = BytesStart::new("Types");
    root.push_attribute(("xmlns", CONTENT_TYPES_NS));
    writer.write_event(Event::Start(root))?;

    for (extension, content_type) in [
        ("rels", "application/vnd.openxmlformats-package.relationships+xml"),
        ("xml", "application/xml"),
    ] {
        writer.write_event(Event::Empty(BytesStart::new("Default").with_attributes([
            ("Extension", extension),
            ("ContentType", content_type),
        ])))?;
    }

    let mut overrides = vec![
        ("/xl/workbook.xml".to_string(), WORKBOOK_TYPE),
        ("/xl/styles.xml".to_string(), STYLES_TYPE),
        ("/docProps/core.xml".to_string(), CORE_TYPE),
    ];
    for i in 1..=sheet_count {
        overrides.push((format!("/xl/worksheets/sheet{}.xml", i), WORKSHEET_TYPE));
    }
    for (part, content_type) in &overrides {
        writer.write_event(Event::Empty(BytesStart::new("Override").with_attributes([
            ("PartName", part.as_str()),
            ("ContentType", *content_type),
        ])))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Types")))?;
    Ok(())
}

fn write_relationships<W: Write>(out: W, relationships: &[(String, &str, String)]) -> Result<()> {
    let mut writer = start_document(out)?;

    let mut root = BytesStart::new("Relationships");
    root.push_attribute(("xmlns", PACKAGE_REL_NS));
    writer.write_event(Event::Start(root))?;

    for (id, rel_type, target) in relationships {
        writer.write_event(Event::Empty(BytesStart::new("Relationship").with_attributes([
            ("Id", id.as_str()),
            ("Type", *rel_type),
            ("Target", target.as_str()),
        ])))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Relationships")))?;
    Ok(())
}

fn write_root_relationships<W: Write>(out: W) -> Result<()> {
    write_relationships(
        out,
        &[
            (
                "rId1".to_string(),
                OFFICE_DOCUMENT_REL,
                "xl/workbook.xml".to_string(),
            ),
            (
                "rId2".to_string(),
                CORE_PROPERTIES_REL,
                "docProps/core.xml".to_string(),
            ),
        ],
    )
}

fn write_workbook_relationships<W: Write>(out: W, sheet_count: usize) -> Result<()> {
    let mut relationships: Vec<(String, &str, String)> = (1..=sheet_count)
        .map(|i| {
            (
                format!("rId{}", i),
                WORKSHEET_REL,
                format!("worksheets/sheet{}.xml", i),
            )
        })
        .collect();
    relationships.push((
        format!("rId{}", sheet_count + 1),
        STYLES_REL,
        "styles.xml".to_string(),
    ));
    write_relationships(out, &relationships)
}

fn write_core_properties<W: Write>(out: W) -> Result<()> {
    let mut writer = start_document(out)?;
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let root = BytesStart::new("cp:coreProperties").with_attributes([
        (
            "xmlns:cp",
            "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
        ),
        ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
        ("xmlns:dcterms", "http://purl.org/dc/terms/"),
        ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ]);
    writer.write_event(Event::Start(root))?;

    writer.write_event(Event::Start(BytesStart::new("dc:creator")))?;
    writer.write_event(Event::Text(BytesText::new(env!("CARGO_PKG_NAME"))))?;
    writer.write_event(Event::End(BytesEnd::new("dc:creator")))?;

    for name in ["dcterms:created", "dcterms:modified"] {
        writer.write_event(Event::Start(
            BytesStart::new(name).with_attributes([("xsi:type", "dcterms:W3CDTF")]),
        ))?;
        writer.write_event(Event::Text(BytesText::new(&now)))?;
        writer.write_event(Event::End(BytesEnd::new(name)))?;
    }

    writer.write_event(Event::End(BytesEnd::new("cp:coreProperties")))?;
    Ok(())
}

fn write_workbook_part<W: Write>(out: W, workbook: &Workbook) -> Result<()> {
    let mut writer = start_document(out)?;

    let root = BytesStart::new("workbook").with_attributes([("xmlns", MAIN_NS), ("xmlns:r", REL_NS)]);
    writer.write_event(Event::Start(root))?;

    writer.write_event(Event::Start(BytesStart::new("bookViews")))?;
    let active = workbook.active.to_string();
    writer.write_event(Event::Empty(
        BytesStart::new("workbookView").with_attributes([("activeTab", active.as_str())]),
    ))?;
    writer.write_event(Event::End(BytesEnd::new("bookViews")))?;

    writer.write_event(Event::Start(BytesStart::new("sheets")))?;
    for (i, sheet) in workbook.sheets.iter().enumerate() {
        let sheet_id = (i + 1).to_string();
        let rel_id = format!("rId{}", i + 1);
        writer.write_event(Event::Empty(BytesStart::new("sheet").with_attributes([
            ("name", sheet.name.as_str()),
            ("sheetId", sheet_id.as_str()),
            ("r:id", rel_id.as_str()),
        ])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("sheets")))?;

    writer.write_event(Event::End(BytesEnd::new("workbook")))?;
    Ok(())
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn write_worksheet<W: Write>(out: W, sheet: &Worksheet, selected: bool) -> Result<()> {
    let mut writer = start_document(out)?;

    let root =
        BytesStart::new("worksheet").with_attributes([("xmlns", MAIN_NS), ("xmlns:r", REL_NS)]);
    writer.write_event(Event::Start(root))?;

    let dimension = sheet.dimension();
    writer.write_event(Event::Empty(
        BytesStart::new("dimension").with_attributes([("ref", dimension.as_str())]),
    ))?;

    writer.write_event(Event::Start(BytesStart::new("sheetViews")))?;
    let mut view = BytesStart::new("sheetView");
    if selected {
        view.push_attribute(("tabSelected", "1"));
    }
    view.push_attribute(("workbookViewId", "0"));
    writer.write_event(Event::Empty(view))?;
    writer.write_event(Event::End(BytesEnd::new("sheetViews")))?;

    writer.write_event(Event::Empty(
        BytesStart::new("sheetFormatPr").with_attributes([("defaultRowHeight", "15")]),
    ))?;

    if !sheet.cols.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("cols")))?;
        for col in &sheet.cols {
            let (min, max, width) = (col.min.to_string(), col.max.to_string(), col.width.to_string());
            writer.write_event(Event::Empty(BytesStart::new("col").with_attributes([
                ("min", min.as_str()),
                ("max", max.as_str()),
                ("width", width.as_str()),
                ("customWidth", "1"),
            ])))?;
        }
        writer.write_event(Event::End(BytesEnd::new("cols")))?;
    }

    writer.write_event(Event::Start(BytesStart::new("sheetData")))?;
    for (r, row) in &sheet.rows {
        let mut row_start = BytesStart::new("row");
        row_start.push_attribute(("r", r.to_string().as_str()));
        if let Some(height) = row.height {
            row_start.push_attribute(("ht", height.to_string().as_str()));
            row_start.push_attribute(("customHeight", "1"));
        }
        writer.write_event(Event::Start(row_start))?;

        for (col, cell) in &row.cells {
            let reference = super::cell::CellRef::new(*col, *r).to_string();
            let mut c = BytesStart::new("c");
            c.push_attribute(("r", reference.as_str()));
            if cell.style != 0 {
                c.push_attribute(("s", cell.style.to_string().as_str()));
            }

            match &cell.value {
                None => writer.write_event(Event::Empty(c))?,
                Some(CellValue::Text(text)) => {
                    c.push_attribute(("t", "inlineStr"));
                    writer.write_event(Event::Start(c))?;
                    writer.write_event(Event::Start(BytesStart::new("is")))?;
                    writer.write_event(Event::Start(
                        BytesStart::new("t").with_attributes([("xml:space", "preserve")]),
                    ))?;
                    writer.write_event(Event::Text(BytesText::new(text)))?;
                    writer.write_event(Event::End(BytesEnd::new("t")))?;
                    writer.write_event(Event::End(BytesEnd::new("is")))?;
                    writer.write_event(Event::End(BytesEnd::new("c")))?;
                }
                Some(CellValue::Number(value)) => {
                    writer.write_event(Event::Start(c))?;
                    write_v(&mut writer, &format_number(*value))?;
                    writer.write_event(Event::End(BytesEnd::new("c")))?;
                }
                Some(CellValue::Bool(value)) => {
                    c.push_attribute(("t", "b"));
                    writer.write_event(Event::Start(c))?;
                    write_v(&mut writer, if *value { "1" } else { "0" })?;
                    writer.write_event(Event::End(BytesEnd::new("c")))?;
                }
            }
        }

        writer.write_event(Event::End(BytesEnd::new("row")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("sheetData")))?;

    if !sheet.merges.is_empty() {
        let count = sheet.merges.len().to_string();
        writer.write_event(Event::Start(
            BytesStart::new("mergeCells").with_attributes([("count", count.as_str())]),
        ))?;
        for merge in &sheet.merges {
            let reference = merge.to_string();
            writer.write_event(Event::Empty(
                BytesStart::new("mergeCell").with_attributes([("ref", reference.as_str())]),
            ))?;
        }
        writer.write_event(Event::End(BytesEnd::new("mergeCells")))?;
    }

    if !sheet.hyperlinks.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("hyperlinks")))?;
        for link in &sheet.hyperlinks {
            let reference = link.cell.to_string();
            let mut element = BytesStart::new("hyperlink").with_attributes([
                ("ref", reference.as_str()),
                ("location", link.location.as_str()),
            ]);
            if let Some(display) = &link.display {
                element.push_attribute(("display", display.as_str()));
            }
            writer.write_event(Event::Empty(element))?;
        }
        writer.write_event(Event::End(BytesEnd::new("hyperlinks")))?;
    }

    writer.write_event(Event::Empty(BytesStart::new("pageMargins").with_attributes([
        ("left", "0.7"),
        ("right", "0.7"),
        ("top", "0.75"),
        ("bottom", "0.75"),
        ("header", "0.3"),
        ("footer", "0.3"),
    ])))?;

    writer.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(())
}

fn write_v<W: Write>(writer: &mut Writer<W>, value: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("v")))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new("v")))?;
    Ok(())
}
