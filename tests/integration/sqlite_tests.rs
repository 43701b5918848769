//! End-to-end tests: introspect a SQLite file and write its dictionary

use std::fs;

use db_dict::introspect::{introspect, list_tables};
use db_dict::model::{build_database, TableType};
use db_dict::render::HOME_SHEET;
use db_dict::xlsx::{CellRef, Workbook};
use db_dict::{generate_dictionary, DbDictError, OutputFormat, SqliteConnection, Vendor};
use pretty_assertions::assert_eq;

use crate::common::TestContext;

fn at(reference: &str) -> CellRef {
    reference.parse().expect("valid cell reference")
}

#[test]
fn test_list_tables_includes_views() {
    let ctx = TestContext::shop();
    let conn = ctx.connect();

    let tables = list_tables(&conn, Vendor::Sqlite, "main").unwrap();
    assert_eq!(tables, vec!["customers", "order_totals", "orders"]);
}

#[test]
fn test_introspected_model() {
    let ctx = TestContext::shop();
    let conn = ctx.connect();

    let (names, raw) = introspect(&conn, Vendor::Sqlite, "main").unwrap();
    let db = build_database("main", &names, &raw);

    assert_eq!(db.table_count(), 3);
    assert_eq!(db.table("order_totals").unwrap().table_type, TableType::View);

    let customers = db.table("customers").unwrap();
    assert_eq!(customers.table_type, TableType::Table);
    let names: Vec<&str> = customers.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "email", "name"]);

    let id = &customers.columns[0];
    assert!(id.is_primary);
    assert!(id.is_auto_increment);
    assert!(!id.is_nullable);

    let email = &customers.columns[1];
    assert_eq!(email.length, Some(120));
    assert!(email.is_unique);
    assert!(!email.is_nullable);
    assert!(customers.columns[2].is_nullable);

    let orders = db.table("orders").unwrap();
    let total = orders.columns.iter().find(|c| c.name == "total").unwrap();
    assert_eq!((total.precision, total.scale), (Some(10), Some(2)));
    assert_eq!(total.default_value.as_deref(), Some("0"));

    let ix = orders
        .indexes
        .iter()
        .find(|i| i.name == "ix_orders_customer")
        .unwrap();
    assert_eq!(ix.column_names, vec!["customer_id", "placed_at"]);
    assert_eq!(ix.index_type, "index");
    assert!(!ix.is_unique);
}

#[test]
fn test_generate_markdown() {
    let ctx = TestContext::shop();
    let paths = ctx.generate(&ctx.options(OutputFormat::Markdown));

    assert_eq!(paths, vec![ctx.output_dir.join("shop.md")]);
    let text = fs::read_to_string(&paths[0]).unwrap();

    assert!(text.contains("# main"));
    assert!(text.contains("| Tables | 3 / 3 |"));
    assert!(text.contains("[order_totals](#table-order_totals) | view |"));
    assert!(text.contains("| 2 | email | VARCHAR(120) | 120 | -, -, 10 | - |"));
    assert!(text.contains("| 3 | total | DECIMAL(10,2) |  | 10, 2, 10 | ✔ | 0 |"));
    assert!(text.contains("| ix_orders_customer | customer_id, placed_at | index |"));
}

#[test]
fn test_generate_spreadsheet() {
    let ctx = TestContext::shop();
    let paths = ctx.generate(&ctx.options(OutputFormat::Spreadsheet));

    assert_eq!(paths, vec![ctx.output_dir.join("shop.xlsx")]);
    let wb = Workbook::open(&paths[0]).unwrap();
    assert_eq!(
        wb.sheet_names(),
        vec![HOME_SHEET, "customers", "order_totals", "orders"]
    );

    let home = wb.sheet(HOME_SHEET).unwrap();
    assert_eq!(home.text(at("B3")), Some("main"));
    for (row, table) in [(8, "customers"), (9, "order_totals"), (10, "orders")] {
        let cell = CellRef::new(2, row);
        assert_eq!(home.text(cell), Some(table));
        assert_eq!(
            home.hyperlink(cell).unwrap().location,
            format!("'{}'!A1", table)
        );
    }

    // Four columns push the index section down by three rows
    let orders = wb.sheet("orders").unwrap();
    assert_eq!(orders.text(at("B11")), Some("customer_id"));
    assert_eq!(orders.text(at("B13")), Some("placed_at"));
    assert_eq!(orders.text(at("B14")), Some("Indexes"));
    assert_eq!(orders.text(at("B16")), Some("ix_orders_customer"));
    assert_eq!(orders.text(at("C16")), Some("customer_id, placed_at"));
}

#[test]
fn test_generate_selected_tables() {
    let ctx = TestContext::shop();
    let mut options = ctx.options(OutputFormat::Spreadsheet);
    options.tables = Some(vec!["orders".to_string(), "missing".to_string()]);

    let paths = ctx.generate(&options);
    let wb = Workbook::open(&paths[0]).unwrap();

    assert_eq!(wb.sheet_names(), vec![HOME_SHEET, "orders"]);
    assert_eq!(wb.sheet(HOME_SHEET).unwrap().text(at("B5")), Some("1 / 3"));
}

#[test]
fn test_generate_refuses_existing_output() {
    let ctx = TestContext::shop();
    let options = ctx.options(OutputFormat::Markdown);
    let paths = ctx.generate(&options);
    let before = fs::read_to_string(&paths[0]).unwrap();

    let conn = ctx.connect();
    let err = generate_dictionary(&conn, &options).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DbDictError>(),
        Some(DbDictError::DestinationExists { .. })
    ));
    assert_eq!(fs::read_to_string(&paths[0]).unwrap(), before);
}

#[test]
fn test_output_named_from_connection_file() {
    let ctx = TestContext::shop();
    let mut options = ctx.options(OutputFormat::Markdown);
    options.source_file = None;

    let paths = ctx.generate(&options);
    assert_eq!(paths, vec![ctx.output_dir.join("shop.md")]);
}

#[test]
fn test_open_missing_file_fails() {
    let ctx = TestContext::shop();
    assert!(SqliteConnection::open(ctx.output_dir.join("nope.sqlite3")).is_err());
}
