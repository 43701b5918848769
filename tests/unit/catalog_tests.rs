//! Unit tests for the dialect query catalog

use db_dict::catalog::{Bind, MetadataKind, Vendor};
use regex::Regex;

/// Highest numbered placeholder in `sql` for a `prefix` such as `$` or `@P`
fn max_placeholder(sql: &str, prefix: &str) -> usize {
    let pattern = Regex::new(&format!(r"{}(\d+)", regex::escape(prefix))).unwrap();
    pattern
        .captures_iter(sql)
        .filter_map(|caps| caps[1].parse().ok())
        .max()
        .unwrap_or(0)
}

#[test]
fn test_numbered_placeholders_match_binds() {
    for (vendor, prefix) in [
        (Vendor::Postgres, "$"),
        (Vendor::SqlServer, "@P"),
        (Vendor::Oracle, ":"),
    ] {
        for kind in vendor.supported_kinds() {
            let query = vendor.query(kind).unwrap();
            assert_eq!(
                max_placeholder(query.sql, prefix),
                query.binds.len(),
                "{} {} placeholders",
                vendor,
                kind
            );
        }
    }
}

#[test]
fn test_mysql_positional_placeholders_match_binds() {
    for kind in Vendor::MySql.supported_kinds() {
        let query = Vendor::MySql.query(kind).unwrap();
        assert_eq!(
            query.sql.matches('?').count(),
            query.binds.len(),
            "mysql {} placeholders",
            kind
        );
    }
}

#[test]
fn test_sqlite_queries_bind_nothing() {
    for kind in Vendor::Sqlite.supported_kinds() {
        let query = Vendor::Sqlite.query(kind).unwrap();
        assert!(query.binds.is_empty(), "sqlite {} binds", kind);
        assert!(query.params("main", None).is_empty());
    }
}

#[test]
fn test_server_vendors_support_every_kind() {
    for vendor in [
        Vendor::MySql,
        Vendor::Postgres,
        Vendor::SqlServer,
        Vendor::Oracle,
    ] {
        assert_eq!(vendor.supported_kinds(), MetadataKind::ALL.to_vec());
    }
}

#[test]
fn test_column_comment_params() {
    let query = Vendor::Postgres.query(MetadataKind::ColumnComments).unwrap();
    assert_eq!(query.binds, &[Bind::Database, Bind::Table]);
    assert_eq!(query.params("public", Some("orders")), vec!["public", "orders"]);
}

#[test]
fn test_vendor_round_trips_through_id() {
    for vendor in Vendor::ALL {
        assert_eq!(vendor.id().parse::<Vendor>().unwrap(), vendor);
    }
    assert!("db2".parse::<Vendor>().is_err());
}
