//! Unit tests for the workbook layer

use db_dict::xlsx::template::{write_template, DATABASE_SHEET, TABLE_SHEET};
use db_dict::xlsx::{column_index, column_name, CellRange, CellRef, CellStyle, CellValue, Workbook};
use tempfile::TempDir;

fn at(s: &str) -> CellRef {
    s.parse().unwrap()
}

fn range(s: &str) -> CellRange {
    s.parse().unwrap()
}

// ============================================================================
// Cell references
// ============================================================================

#[test]
fn test_column_names() {
    for (index, name) in [(1, "A"), (11, "K"), (26, "Z"), (27, "AA"), (702, "ZZ"), (703, "AAA")] {
        assert_eq!(column_name(index), name);
        assert_eq!(column_index(name), Some(index));
    }
    assert_eq!(column_index("a"), Some(1));
    assert_eq!(column_index(""), None);
    assert_eq!(column_index("A1"), None);
}

#[test]
fn test_cell_ref_parsing() {
    assert_eq!(at("B10"), CellRef::new(2, 10));
    assert_eq!(at("$C$7"), CellRef::new(3, 7));
    assert_eq!(CellRef::at("K", 12).unwrap(), CellRef::new(11, 12));
    assert_eq!(CellRef::new(28, 3).to_string(), "AB3");
    assert!("B0".parse::<CellRef>().is_err());
    assert!("10".parse::<CellRef>().is_err());
    assert!("B".parse::<CellRef>().is_err());
}

#[test]
fn test_range_normalizes_corners() {
    let r = range("G12:C10");
    assert_eq!(r.to_string(), "C10:G12");
    assert!(r.contains(at("E11")));
    assert!(!r.contains(at("H11")));
    assert!(r.overlaps(&range("G12:H13")));
    assert!(!r.overlaps(&range("A1:B9")));
    assert_eq!(range("B2:C3").cells().count(), 4);
}

// ============================================================================
// Template workbook
// ============================================================================

#[test]
fn test_template_scaffolds() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("template.xlsx");
    write_template(&path).unwrap();

    let wb = Workbook::open(&path).unwrap();
    assert_eq!(wb.sheet_names(), vec![DATABASE_SHEET, TABLE_SHEET]);

    let index = wb.sheet(DATABASE_SHEET).unwrap();
    assert_eq!(index.text(at("A3")), Some("Database"));
    assert_eq!(index.text(at("B7")), Some("Table"));

    let table = wb.sheet(TABLE_SHEET).unwrap();
    assert_eq!(table.text(at("A1")), Some("Home"));
    assert_eq!(table.text(at("B9")), Some("Column"));
    assert_eq!(table.text(at("K9")), Some("Comment"));
    assert_eq!(table.text(at("B11")), Some("Indexes"));
    assert_eq!(table.text(at("B12")), Some("Index"));
    assert!(table.merges().contains(&range("C12:G12")));
}

#[test]
fn test_write_template_replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("template.xlsx");
    std::fs::write(&path, b"not a workbook").unwrap();

    write_template(&path).unwrap();
    assert!(Workbook::open(&path).is_ok());
}

#[test]
fn test_save_preserves_edits() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("book.xlsx");
    write_template(&path).unwrap();

    let mut wb = Workbook::open(&path).unwrap();
    wb.copy_sheet(TABLE_SHEET, "orders").unwrap();
    let style = wb.add_style(CellStyle::table_cell());
    {
        let sheet = wb.sheet_mut("orders").unwrap();
        sheet.insert_rows(11, 2).unwrap();
        sheet.set_value(at("B10"), "id");
        sheet.set_value(at("D10"), 11i64);
        sheet.set_style(range("B10:K12"), style);
        sheet.set_hyperlink(at("A1"), "'Home'!A1");
    }
    wb.delete_sheet(DATABASE_SHEET).unwrap();
    wb.set_active("orders").unwrap();
    wb.save().unwrap();

    let reopened = Workbook::open(&path).unwrap();
    assert_eq!(reopened.sheet_names(), vec![TABLE_SHEET, "orders"]);
    assert_eq!(reopened.active_sheet_name(), Some("orders"));

    let sheet = reopened.sheet("orders").unwrap();
    assert_eq!(sheet.text(at("B10")), Some("id"));
    assert_eq!(sheet.value(at("D10")), Some(&CellValue::Number(11.0)));
    assert_eq!(sheet.cell(at("K12")).unwrap().style, style);
    assert_eq!(sheet.text(at("B13")), Some("Indexes"));
    assert!(sheet.merges().contains(&range("C14:G14")));
    assert_eq!(sheet.hyperlink(at("A1")).unwrap().location, "'Home'!A1");
}
