//! Unit tests for the metadata aggregator and schema model

use std::collections::HashMap;

use db_dict::model::{build_database, ColumnInfo, IndexInfo, RawCatalog, TableType};

fn column(table: &str, ordinal: i64, name: &str) -> ColumnInfo {
    ColumnInfo {
        ordinal,
        database_name: "shop".to_string(),
        table_name: table.to_string(),
        name: name.to_string(),
        data_type: "varchar".to_string(),
        ..Default::default()
    }
}

fn index(table: &str, name: &str, columns: &[&str]) -> IndexInfo {
    IndexInfo {
        database_name: "shop".to_string(),
        table_name: table.to_string(),
        name: name.to_string(),
        column_names: columns.iter().map(|c| c.to_string()).collect(),
        index_type: "BTREE".to_string(),
        ..Default::default()
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn shop_catalog() -> RawCatalog {
    RawCatalog {
        table_types: HashMap::from([
            ("orders".to_string(), "table".to_string()),
            ("customers".to_string(), "table".to_string()),
            ("order_view".to_string(), "VIEW".to_string()),
        ]),
        columns: vec![
            column("orders", 2, "customer_id"),
            column("orders", 1, "id"),
            column("customers", 1, "id"),
            column("customers", 2, "email"),
            column("order_view", 1, "id"),
            // Repeated row from a join in the catalog query
            column("customers", 2, "email"),
        ],
        indexes: vec![
            index("orders", "PRIMARY", &["id"]),
            index("orders", "ix_customer", &["customer_id", "id"]),
            index("orders", "ix_customer", &["customer_id", "id"]),
            index("customers", "PRIMARY", &["id"]),
        ],
        table_comments: HashMap::from([("orders".to_string(), "Customer orders".to_string())]),
    }
}

#[test]
fn test_build_database_groups_by_table() {
    let raw = shop_catalog();
    let db = build_database("shop", &names(&["orders", "customers", "order_view"]), &raw);

    assert_eq!(db.database_name, "shop");
    assert_eq!(db.table_names(), vec!["customers", "order_view", "orders"]);

    let orders = db.table("orders").unwrap();
    assert_eq!(orders.comment, "Customer orders");
    assert_eq!(orders.table_type, TableType::Table);
    let columns: Vec<&str> = orders.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(columns, vec!["id", "customer_id"]);
    let indexes: Vec<&str> = orders.indexes.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(indexes, vec!["PRIMARY", "ix_customer"]);
    assert_eq!(orders.indexes[1].columns_joined(", "), "customer_id, id");

    assert_eq!(db.table("customers").unwrap().columns.len(), 2);
    assert_eq!(db.table("order_view").unwrap().table_type, TableType::View);
    assert!(db.table("order_view").unwrap().indexes.is_empty());
}

#[test]
fn test_build_database_is_idempotent() {
    let raw = shop_catalog();
    let tables = names(&["orders", "customers", "order_view"]);

    let first = build_database("shop", &tables, &raw);
    let second = build_database("shop", &tables, &raw);
    assert_eq!(first, second);
}

#[test]
fn test_only_listed_tables_are_built() {
    let raw = shop_catalog();
    let db = build_database("shop", &names(&["orders"]), &raw);
    assert_eq!(db.table_names(), vec!["orders"]);
}

#[test]
fn test_table_without_columns_is_skipped() {
    let raw = shop_catalog();
    let db = build_database("shop", &names(&["orders", "ghost"]), &raw);
    assert_eq!(db.table_count(), 1);
    assert!(db.table("ghost").is_none());
}

#[test]
fn test_vendor_specific_type_tag_is_kept() {
    let mut raw = shop_catalog();
    raw.table_types
        .insert("orders".to_string(), "foreign_table".to_string());
    let db = build_database("shop", &names(&["orders"]), &raw);
    assert_eq!(db.table("orders").unwrap().table_type.as_str(), "foreign_table");
}

#[test]
fn test_selection_scopes_rendering() {
    let raw = shop_catalog();
    let mut db = build_database("shop", &names(&["orders", "customers", "order_view"]), &raw);

    db.set_selected_table_names(["orders", "nope", "customers"]);
    assert_eq!(db.selected_table_names(), vec!["orders", "customers"]);
    let selected: Vec<&str> = db.selected_tables().map(|t| t.name.as_str()).collect();
    assert_eq!(selected, vec!["customers", "orders"]);

    db.clear_selection();
    assert_eq!(db.selected_table_count(), 3);
}
