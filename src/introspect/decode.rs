//! Row decoding into model records

use crate::model::{ColumnInfo, IndexInfo};
use crate::util::{parse_type_size, split_column_names};

use super::Row;

pub(super) fn column(row: &Row) -> ColumnInfo {
    let data_type = row.text("data_type");
    let mut length = row.int("length");
    let mut precision = row.int("precision");
    let mut scale = row.int("scale");

    // Fill in whatever the catalog left out from the declared type
    if length.is_none() && precision.is_none() && scale.is_none() {
        let size = parse_type_size(&data_type);
        length = size.length;
        precision = size.precision;
        scale = size.scale;
    }

    ColumnInfo {
        ordinal: row.int("sort").unwrap_or_default(),
        database_name: row.text("database_name"),
        schema_name: row.text("schema_name"),
        table_name: row.text("table_name"),
        name: row.text("column_name"),
        data_type,
        length,
        precision,
        scale,
        radix: row.int("radix"),
        is_nullable: row.flag("nullable"),
        is_primary: row.flag("is_primary"),
        is_auto_increment: row.flag("is_auto_increment"),
        is_unique: row.flag("is_unique"),
        default_value: row.opt_text("default"),
        comment: row.text("comment"),
    }
}

pub(super) fn index(row: &Row) -> IndexInfo {
    IndexInfo {
        database_name: row.text("database_name"),
        schema_name: row.text("schema_name"),
        table_name: row.text("table_name"),
        name: row.text("index_name"),
        column_names: split_column_names(&row.text("column_names")),
        is_unique: row.flag("is_unique"),
        is_primary: row.flag("is_primary"),
        index_type: row.text("index_type"),
        comment: row.text("index_comment"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::SqlValue;
    use std::rc::Rc;

    fn row(pairs: &[(&str, SqlValue)]) -> Row {
        let columns: Rc<[String]> = pairs.iter().map(|(c, _)| c.to_string()).collect();
        Row::new(columns, pairs.iter().map(|(_, v)| v.clone()).collect())
    }

    #[test]
    fn test_column_size_derived_from_declared_type() {
        let c = column(&row(&[
            ("column_name", SqlValue::Text("name".into())),
            ("data_type", SqlValue::Text("VARCHAR(32)".into())),
            ("length", SqlValue::Null),
        ]));
        assert_eq!(c.length, Some(32));
        assert_eq!(c.precision, None);
    }

    #[test]
    fn test_column_size_from_catalog_wins() {
        let c = column(&row(&[
            ("data_type", SqlValue::Text("numeric".into())),
            ("precision", SqlValue::Int(12)),
            ("scale", SqlValue::Int(4)),
        ]));
        assert_eq!((c.precision, c.scale), (Some(12), Some(4)));
    }

    #[test]
    fn test_index_column_list_split() {
        let i = index(&row(&[
            ("index_name", SqlValue::Text("ix".into())),
            ("column_names", SqlValue::Text("a, b".into())),
            ("is_unique", SqlValue::Bool(true)),
        ]));
        assert_eq!(i.column_names, vec!["a", "b"]);
        assert!(i.is_unique);
        assert!(!i.is_primary);
    }
}
