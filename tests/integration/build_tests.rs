//! Integration tests for the build orchestrator over both output formats

use std::fs;

use db_dict::model::{DatabaseInfo, TableInfo, TableType};
use db_dict::render::HOME_SHEET;
use db_dict::xlsx::{CellRef, Workbook};
use db_dict::{build_all, build_all_with_progress, BuildOptions, DbDictError, OutputFormat};
use tempfile::TempDir;

use crate::common::{numbered_database, t1_database};

fn options(dir: &TempDir, format: OutputFormat) -> BuildOptions {
    BuildOptions {
        output_dir: dir.path().join("out"),
        format,
        overwrite: false,
        source_file: None,
    }
}

fn at(reference: &str) -> CellRef {
    reference.parse().expect("valid cell reference")
}

// ============================================================================
// Spreadsheet
// ============================================================================

#[test]
fn test_spreadsheet_single_table() {
    let dir = TempDir::new().unwrap();
    let db = t1_database();

    let paths = build_all(&db, &options(&dir, OutputFormat::Spreadsheet)).unwrap();
    assert_eq!(paths, vec![dir.path().join("out").join("demo.xlsx")]);

    let wb = Workbook::open(&paths[0]).unwrap();
    assert_eq!(wb.sheet_names(), vec![HOME_SHEET, "t1"]);
    assert_eq!(wb.active_sheet_name(), Some(HOME_SHEET));

    let home = wb.sheet(HOME_SHEET).unwrap();
    assert_eq!(home.text(at("B3")), Some("demo"));
    assert_eq!(home.text(at("B5")), Some("1 / 1"));
    assert_eq!(home.text(at("B8")), Some("t1"));
    assert_eq!(home.text(at("C8")), Some("table"));
    assert_eq!(home.hyperlink(at("B8")).unwrap().location, "'t1'!A1");

    let t1 = wb.sheet("t1").unwrap();
    assert_eq!(t1.hyperlink(at("A1")).unwrap().location, "'Home'!A1");
    assert_eq!(t1.text(at("B1")), Some("demo / t1"));
    assert_eq!(t1.text(at("B3")), Some("t1"));
    assert_eq!(t1.text(at("B10")), Some("id"));
    assert_eq!(t1.text(at("H10")), Some("✔"));
    assert_eq!(t1.text(at("I10")), Some("✔"));
    assert_eq!(t1.text(at("B11")), Some("name"));
    assert_eq!(t1.text(at("F11")), Some("✔"));
    assert_eq!(t1.text(at("H11")), Some("-"));

    // One column row was inserted, so the index section moved down by one
    assert_eq!(t1.text(at("B12")), Some("Indexes"));
    assert_eq!(t1.text(at("B13")), Some("Index"));
    assert_eq!(t1.text(at("B14")), Some("idx_name"));
    assert_eq!(t1.text(at("C14")), Some("name"));
    assert_eq!(t1.text(at("H14")), Some("index"));
    assert!(t1.merges().contains(&"C14:G14".parse().unwrap()));
}

#[test]
fn test_spreadsheet_removes_scaffold_sheets() {
    let dir = TempDir::new().unwrap();
    let db = numbered_database(3);

    let paths = build_all(&db, &options(&dir, OutputFormat::Spreadsheet)).unwrap();
    let wb = Workbook::open(&paths[0]).unwrap();

    assert_eq!(wb.sheet_names(), vec![HOME_SHEET, "t1", "t2", "t3"]);
    let home = wb.sheet(HOME_SHEET).unwrap();
    assert_eq!(home.text(at("B8")), Some("t1"));
    assert_eq!(home.text(at("B10")), Some("t3"));
    assert_eq!(home.hyperlink(at("B10")).unwrap().location, "'t3'!A1");
}

fn bare_table(name: &str) -> TableInfo {
    TableInfo {
        database_name: "demo".to_string(),
        name: name.to_string(),
        table_type: TableType::Table,
        comment: String::new(),
        columns: vec![],
        indexes: vec![],
    }
}

#[test]
fn test_spreadsheet_table_named_home_gets_own_sheet() {
    let dir = TempDir::new().unwrap();
    let mut db = numbered_database(1);
    db.add_table(bare_table("Home"));

    let paths = build_all(&db, &options(&dir, OutputFormat::Spreadsheet)).unwrap();
    let wb = Workbook::open(&paths[0]).unwrap();

    assert_eq!(wb.sheet_names(), vec![HOME_SHEET, "Home~2", "t1"]);
    let home = wb.sheet(HOME_SHEET).unwrap();
    assert_eq!(home.text(at("B8")), Some("Home"));
    assert_eq!(home.hyperlink(at("B8")).unwrap().location, "'Home~2'!A1");
    assert_eq!(home.hyperlink(at("B9")).unwrap().location, "'t1'!A1");

    let page = wb.sheet("Home~2").unwrap();
    assert_eq!(page.text(at("B3")), Some("Home"));
    assert_eq!(page.hyperlink(at("A1")).unwrap().location, "'Home'!A1");
}

#[test]
fn test_spreadsheet_long_names_sharing_a_prefix() {
    let dir = TempDir::new().unwrap();
    let mut db = DatabaseInfo::new("demo");
    for name in [
        "customer_order_line_item_history_2020",
        "customer_order_line_item_history_2021",
    ] {
        db.add_table(bare_table(name));
    }

    let paths = build_all(&db, &options(&dir, OutputFormat::Spreadsheet)).unwrap();
    let wb = Workbook::open(&paths[0]).unwrap();

    assert_eq!(
        wb.sheet_names(),
        vec![
            HOME_SHEET,
            "customer_order_line_item_histor",
            "customer_order_line_item_hist~2"
        ]
    );
    let home = wb.sheet(HOME_SHEET).unwrap();
    assert_eq!(
        home.hyperlink(at("B9")).unwrap().location,
        "'customer_order_line_item_hist~2'!A1"
    );
    let second = wb.sheet("customer_order_line_item_hist~2").unwrap();
    assert_eq!(
        second.text(at("B3")),
        Some("customer_order_line_item_history_2021")
    );
}

#[test]
fn test_spreadsheet_empty_selection_writes_index_only() {
    let dir = TempDir::new().unwrap();
    let mut db = numbered_database(2);
    db.set_selected_table_names(Vec::<String>::new());

    let mut seen = Vec::new();
    let paths = build_all_with_progress(&db, &options(&dir, OutputFormat::Spreadsheet), |p| {
        seen.push((p.current, p.total))
    })
    .unwrap();

    assert_eq!(seen, vec![(1, 1)]);
    let wb = Workbook::open(&paths[0]).unwrap();
    assert_eq!(wb.sheet_names(), vec![HOME_SHEET]);
    assert_eq!(wb.sheet(HOME_SHEET).unwrap().text(at("B5")), Some("0 / 2"));
}

#[test]
fn test_spreadsheet_selection_limits_sheets() {
    let dir = TempDir::new().unwrap();
    let mut db = numbered_database(3);
    db.set_selected_table_names(["t3", "t1"]);

    let paths = build_all(&db, &options(&dir, OutputFormat::Spreadsheet)).unwrap();
    let wb = Workbook::open(&paths[0]).unwrap();

    assert_eq!(wb.sheet_names(), vec![HOME_SHEET, "t1", "t3"]);
    assert_eq!(wb.sheet(HOME_SHEET).unwrap().text(at("B5")), Some("2 / 3"));
}

// ============================================================================
// Markdown
// ============================================================================

#[test]
fn test_markdown_single_table() {
    let dir = TempDir::new().unwrap();
    let db = t1_database();

    let paths = build_all(&db, &options(&dir, OutputFormat::Markdown)).unwrap();
    assert_eq!(paths, vec![dir.path().join("out").join("demo.md")]);

    let text = fs::read_to_string(&paths[0]).unwrap();
    assert!(text.contains("<a id=\"database-demo\"></a>"));
    assert!(text.contains("| 1 | [t1](#table-t1) | table |  |"));
    assert!(text.contains("<a id=\"table-t1\"></a>"));
    assert!(text.contains("[Back to demo](#database-demo)"));
    assert!(text.contains("| 1 | id | integer |"));
    assert!(text.contains("| 1 | idx_name | name | index | - | - |  |"));

    // Index section precedes the table section
    let index_at = text.find("## Tables").unwrap();
    let table_at = text.find("## t1").unwrap();
    assert!(index_at < table_at);
}

#[test]
fn test_markdown_sections_in_name_order() {
    let dir = TempDir::new().unwrap();
    let db = numbered_database(3);

    let paths = build_all(&db, &options(&dir, OutputFormat::Markdown)).unwrap();
    let text = fs::read_to_string(&paths[0]).unwrap();

    let positions: Vec<usize> = ["## t1", "## t2", "## t3"]
        .iter()
        .map(|heading| text.find(heading).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

// ============================================================================
// Orchestration
// ============================================================================

#[test]
fn test_progress_counts_every_unit() {
    let dir = TempDir::new().unwrap();
    let db = numbered_database(2);

    let mut seen = Vec::new();
    build_all_with_progress(&db, &options(&dir, OutputFormat::Markdown), |p| {
        seen.push((p.current, p.total, p.is_last()))
    })
    .unwrap();

    assert_eq!(seen, vec![(1, 3, false), (2, 3, false), (3, 3, true)]);
}

#[test]
fn test_existing_output_is_not_overwritten() {
    let dir = TempDir::new().unwrap();
    let db = t1_database();
    let opts = options(&dir, OutputFormat::Spreadsheet);

    let paths = build_all(&db, &opts).unwrap();
    let before = fs::read(&paths[0]).unwrap();

    let err = build_all(&db, &opts).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DbDictError>(),
        Some(DbDictError::DestinationExists { .. })
    ));
    assert_eq!(fs::read(&paths[0]).unwrap(), before);
}

#[test]
fn test_overwrite_replaces_output() {
    let dir = TempDir::new().unwrap();
    let opts = options(&dir, OutputFormat::Markdown);

    build_all(&numbered_database(1), &opts).unwrap();

    let opts = BuildOptions {
        overwrite: true,
        ..opts
    };
    let paths = build_all(&numbered_database(2), &opts).unwrap();
    let text = fs::read_to_string(&paths[0]).unwrap();
    assert!(text.contains("## t2"));
    assert_eq!(text.matches("## t1").count(), 1);
}

#[test]
fn test_missing_output_directory() {
    let db = t1_database();
    let opts = BuildOptions {
        output_dir: Default::default(),
        format: OutputFormat::Markdown,
        overwrite: false,
        source_file: None,
    };

    let err = build_all(&db, &opts).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DbDictError>(),
        Some(DbDictError::MissingOutputDirectory)
    ));
}

#[test]
fn test_output_named_after_source_file() {
    let dir = TempDir::new().unwrap();
    let opts = BuildOptions {
        source_file: Some(dir.path().join("inventory.sqlite3")),
        ..options(&dir, OutputFormat::Markdown)
    };

    let paths = build_all(&t1_database(), &opts).unwrap();
    assert_eq!(paths, vec![dir.path().join("out").join("inventory.md")]);
}
