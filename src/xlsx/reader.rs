//! Read an `.xlsx` package into a [`Workbook`]

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Result;
use zip::ZipArchive;

use crate::error::DbDictError;

use super::cell::{CellRange, CellRef};
use super::styles::Styles;
use super::workbook::{Cell, CellValue, ColumnWidth, Hyperlink, SheetRow, Workbook, Worksheet};
use super::REL_NS;

/// All parts of a package, loaded into memory.
struct Package {
    parts: HashMap<String, Vec<u8>>,
}

impl Package {
    fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| DbDictError::WorkbookRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut archive = ZipArchive::new(file).map_err(|e| DbDictError::ZipError {
            message: format!("Failed to read workbook {}: {}", path.display(), e),
        })?;

        let mut parts = HashMap::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| DbDictError::ZipError {
                message: format!("Failed to read entry {} in {}: {}", i, path.display(), e),
            })?;

            let name = entry.name().trim_start_matches('/').to_string();
            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(|e| DbDictError::WorkbookRead {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            parts.insert(name, data);
        }

        Ok(Self { parts })
    }

    fn get_string(&self, name: &str) -> Option<String> {
        self.parts
            .get(name)
            .and_then(|data| String::from_utf8(data.clone()).ok())
    }

    fn require(&self, name: &str) -> Result<String> {
        self.get_string(name).ok_or_else(|| {
            DbDictError::Workbook {
                message: format!("missing part {}", name),
            }
            .into()
        })
    }
}

pub(super) fn read_workbook(path: &Path) -> Result<Workbook> {
    let package = Package::from_path(path)?;

    let workbook_xml = package.require("xl/workbook.xml")?;
    let rels = parse_relationships(&package.require("xl/_rels/workbook.xml.rels")?)?;
    let shared = match package.get_string("xl/sharedStrings.xml") {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };
    let styles = match package.get_string("xl/styles.xml") {
        Some(xml) => Styles::parse(&xml)?,
        None => Styles::parse(r#"<styleSheet/>"#)?,
    };

    let doc = roxmltree::Document::parse(&workbook_xml)?;
    let root = doc.root_element();

    let active = root
        .descendants()
        .find(|n| n.tag_name().name() == "workbookView")
        .and_then(|n| n.attribute("activeTab"))
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut sheets = Vec::new();
    for node in root.descendants().filter(|n| n.tag_name().name() == "sheet") {
        let name = node.attribute("name").unwrap_or_default();
        let rel_id = node
            .attribute((REL_NS, "id"))
            .ok_or_else(|| DbDictError::Workbook {
                message: format!("sheet {} has no relationship", name),
            })?;
        let target = rels.get(rel_id).ok_or_else(|| DbDictError::Workbook {
            message: format!("sheet {} points to unknown relationship {}", name, rel_id),
        })?;

        let part = resolve_target(target);
        let xml = package.require(&part)?;
        sheets.push(parse_sheet(name, &xml, &shared)?);
    }

    if sheets.is_empty() {
        return Err(DbDictError::Workbook {
            message: format!("{} has no worksheets", path.display()),
        }
        .into());
    }

    Ok(Workbook::from_parts(sheets, active, styles))
}

/// Relationship targets are relative to `xl/` unless rooted
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(rooted) => rooted.to_string(),
        None => format!("xl/{}", target),
    }
}

fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let doc = roxmltree::Document::parse(xml)?;
    Ok(doc
        .descendants()
        .filter(|n| n.tag_name().name() == "Relationship")
        .filter_map(|n| Some((n.attribute("Id")?.to_string(), n.attribute("Target")?.to_string())))
        .collect())
}

fn parse_shared_strings(xml: &str) -> Result<Vec<String>> {
    let doc = roxmltree::Document::parse(xml)?;
    Ok(doc
        .root_element()
        .children()
        .filter(|n| n.tag_name().name() == "si")
        .map(|si| inline_text(&si))
        .collect())
}

/// Concatenated text of every `<t>` below a node, skipping phonetic runs
fn inline_text(node: &roxmltree::Node) -> String {
    node.descendants()
        .filter(|n| n.tag_name().name() == "t")
        .filter(|n| {
            !n.ancestors()
                .any(|a| a.tag_name().name() == "rPh")
        })
        .filter_map(|n| n.text())
        .collect()
}

fn parse_sheet(name: &str, xml: &str, shared: &[String]) -> Result<Worksheet> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut sheet = Worksheet::new(name);

    for node in doc.root_element().children().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "cols" => {
                for col in node.children().filter(|n| n.tag_name().name() == "col") {
                    let attr = |a: &str| col.attribute(a).and_then(|v| v.parse::<f64>().ok());
                    if let (Some(min), Some(max), Some(width)) =
                        (attr("min"), attr("max"), attr("width"))
                    {
                        sheet.cols.push(ColumnWidth {
                            min: min as u32,
                            max: max as u32,
                            width,
                        });
                    }
                }
            }
            "sheetData" => parse_sheet_data(&mut sheet, &node, shared)?,
            "mergeCells" => {
                for merge in node.children().filter(|n| n.tag_name().name() == "mergeCell") {
                    if let Some(reference) = merge.attribute("ref") {
                        sheet.merges.push(reference.parse::<CellRange>()?);
                    }
                }
            }
            "hyperlinks" => {
                for link in node.children().filter(|n| n.tag_name().name() == "hyperlink") {
                    // External links need relationships; only in-workbook links are kept
                    let (Some(reference), Some(location)) =
                        (link.attribute("ref"), link.attribute("location"))
                    else {
                        continue;
                    };
                    sheet.hyperlinks.push(Hyperlink {
                        cell: reference.parse()?,
                        location: location.to_string(),
                        display: link.attribute("display").map(str::to_string),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(sheet)
}

fn parse_sheet_data(sheet: &mut Worksheet, data: &roxmltree::Node, shared: &[String]) -> Result<()> {
    let mut row_number = 0;
    for row in data.children().filter(|n| n.tag_name().name() == "row") {
        row_number = match row.attribute("r").and_then(|r| r.parse::<u32>().ok()) {
            Some(r) => r,
            None => row_number + 1,
        };

        let mut sheet_row = SheetRow {
            height: row
                .attribute("customHeight")
                .filter(|v| *v == "1" || *v == "true")
                .and(row.attribute("ht"))
                .and_then(|v| v.parse().ok()),
            ..Default::default()
        };

        let mut col = 0;
        for c in row.children().filter(|n| n.tag_name().name() == "c") {
            col = match c.attribute("r") {
                Some(r) => r.parse::<CellRef>()?.col,
                None => col + 1,
            };

            let style = c
                .attribute("s")
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(0);
            sheet_row.cells.insert(
                col,
                Cell {
                    value: cell_value(&c, shared),
                    style,
                },
            );
        }

        sheet.rows.insert(row_number, sheet_row);
    }
    Ok(())
}

fn cell_value(c: &roxmltree::Node, shared: &[String]) -> Option<CellValue> {
    let raw = c
        .children()
        .find(|n| n.tag_name().name() == "v")
        .and_then(|v| v.text());

    match c.attribute("t").unwrap_or("n") {
        "inlineStr" => c
            .children()
            .find(|n| n.tag_name().name() == "is")
            .map(|is| CellValue::Text(inline_text(&is))),
        "s" => raw
            .and_then(|v| v.trim().parse::<usize>().ok())
            .and_then(|i| shared.get(i))
            .map(|s| CellValue::Text(s.clone())),
        "b" => raw.map(|v| CellValue::Bool(v.trim() == "1")),
        "str" | "e" => raw.map(|v| CellValue::Text(v.to_string())),
        _ => raw.and_then(|v| v.trim().parse::<f64>().ok().map(CellValue::Number)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sheet() {
        let xml = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <cols><col min="2" max="2" width="24.5" customWidth="1"/></cols>
  <sheetData>
    <row r="1" ht="30" customHeight="1">
      <c r="A1" s="2" t="inlineStr"><is><t>Home</t></is></c>
      <c r="B1" t="s"><v>0</v></c>
    </row>
    <row r="3"><c r="B3"><v>42</v></c><c t="b"><v>1</v></c></row>
  </sheetData>
  <mergeCells count="1"><mergeCell ref="B1:K1"/></mergeCells>
  <hyperlinks><hyperlink ref="A1" location="'Home'!A1" display="Home"/><hyperlink ref="A2" r:id="rId1" xmlns:r="urn:x"/></hyperlinks>
</worksheet>"#;
        let sheet = parse_sheet("t", xml, &["shared".to_string()]).unwrap();

        let at = |s: &str| s.parse::<CellRef>().unwrap();
        assert_eq!(sheet.text(at("A1")), Some("Home"));
        assert_eq!(sheet.cell(at("A1")).unwrap().style, 2);
        assert_eq!(sheet.text(at("B1")), Some("shared"));
        assert_eq!(sheet.value(at("B3")), Some(&CellValue::Number(42.0)));
        assert_eq!(sheet.value(at("C3")), Some(&CellValue::Bool(true)));
        assert_eq!(sheet.rows.get(&1).unwrap().height, Some(30.0));
        assert_eq!(sheet.cols.len(), 1);
        assert_eq!(sheet.merges().len(), 1);
        assert_eq!(sheet.hyperlinks().len(), 1);
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
        assert_eq!(resolve_target("/xl/worksheets/sheet1.xml"), "xl/worksheets/sheet1.xml");
    }

    #[test]
    fn test_missing_file() {
        assert!(read_workbook(Path::new("/nonexistent/book.xlsx")).is_err());
    }
}
