//! MySQL / MariaDB catalog queries (INFORMATION_SCHEMA)

use super::{Bind, CatalogQuery, MetadataKind};

const TABLE_NAMES: &str = r#"
SELECT
    t.TABLE_NAME AS table_name
FROM INFORMATION_SCHEMA.TABLES t
WHERE
    t.TABLE_SCHEMA = ?
ORDER BY
    t.TABLE_NAME
"#;

const TABLE_TYPES: &str = r#"
SELECT
    t.TABLE_NAME AS table_name
  , (CASE t.TABLE_TYPE
         WHEN 'BASE TABLE' THEN 'table'
         WHEN 'VIEW' THEN 'view'
         WHEN 'SYSTEM VIEW' THEN 'sys_view'
         ELSE 'other'
    END) AS table_type
FROM INFORMATION_SCHEMA.TABLES t
WHERE
    t.TABLE_SCHEMA = ?
ORDER BY
    table_name
  , table_type
"#;

const COLUMNS: &str = r#"
SELECT
    c.ORDINAL_POSITION AS sort
  , c.TABLE_CATALOG AS database_name
  , c.TABLE_SCHEMA AS schema_name
  , c.TABLE_NAME AS table_name
  , c.COLUMN_NAME AS column_name
  , c.DATA_TYPE AS data_type
  , c.CHARACTER_MAXIMUM_LENGTH AS length
  , c.NUMERIC_PRECISION AS `precision`
  , c.NUMERIC_SCALE AS scale
  , NULL AS radix
  , CASE c.IS_NULLABLE WHEN 'YES' THEN 1 ELSE 0 END AS nullable
  , CASE WHEN c.COLUMN_KEY = 'PRI' THEN 1 ELSE 0 END AS is_primary
  , CASE WHEN c.EXTRA LIKE '%auto_increment%' THEN 1 ELSE 0 END AS is_auto_increment
  , CASE WHEN c.COLUMN_KEY = 'UNI' THEN 1 ELSE 0 END AS is_unique
  , c.COLUMN_DEFAULT AS `default`
  , c.COLUMN_COMMENT AS comment
FROM INFORMATION_SCHEMA.COLUMNS c
WHERE
    c.TABLE_SCHEMA = ?
ORDER BY
    c.TABLE_NAME
  , c.ORDINAL_POSITION
"#;

const INDEXES: &str = r#"
SELECT
    DATABASE() AS database_name
  , s.TABLE_SCHEMA AS schema_name
  , s.TABLE_NAME AS table_name
  , s.INDEX_NAME AS index_name
  , s.INDEX_TYPE AS index_type
  , GROUP_CONCAT(s.COLUMN_NAME ORDER BY s.SEQ_IN_INDEX SEPARATOR ',') AS column_names
  , CASE WHEN s.NON_UNIQUE = 0 THEN 1 ELSE 0 END AS is_unique
  , CASE WHEN s.INDEX_NAME = 'PRIMARY' THEN 1 ELSE 0 END AS is_primary
  , s.INDEX_COMMENT AS index_comment
FROM INFORMATION_SCHEMA.STATISTICS s
WHERE
    s.TABLE_SCHEMA = ?
GROUP BY
    s.TABLE_SCHEMA
  , s.TABLE_NAME
  , s.INDEX_NAME
  , s.NON_UNIQUE
  , s.INDEX_TYPE
  , s.INDEX_COMMENT
ORDER BY
    table_name
  , index_name
"#;

// Views carry the literal comment 'VIEW' in MySQL, so only base tables are read.
const TABLE_COMMENTS: &str = r#"
SELECT
    t.TABLE_NAME AS table_name
  , t.TABLE_COMMENT AS comment
FROM INFORMATION_SCHEMA.TABLES t
WHERE
    t.TABLE_SCHEMA = ?
  AND t.TABLE_TYPE = 'BASE TABLE'
  AND t.TABLE_COMMENT <> ''
"#;

const COLUMN_COMMENTS: &str = r#"
SELECT
    c.COLUMN_NAME AS column_name
  , c.COLUMN_COMMENT AS comment
FROM INFORMATION_SCHEMA.COLUMNS c
WHERE
    c.TABLE_SCHEMA = ?
  AND c.TABLE_NAME = ?
  AND c.COLUMN_COMMENT <> ''
"#;

pub(super) fn query(kind: MetadataKind) -> Option<CatalogQuery> {
    let query = match kind {
        MetadataKind::TableNames => CatalogQuery::new(TABLE_NAMES, &[Bind::Database]),
        MetadataKind::TableTypes => CatalogQuery::new(TABLE_TYPES, &[Bind::Database]),
        MetadataKind::Columns => CatalogQuery::new(COLUMNS, &[Bind::Database]),
        MetadataKind::Indexes => CatalogQuery::new(INDEXES, &[Bind::Database]),
        MetadataKind::TableComments => CatalogQuery::new(TABLE_COMMENTS, &[Bind::Database]),
        MetadataKind::ColumnComments => {
            CatalogQuery::new(COLUMN_COMMENTS, &[Bind::Database, Bind::Table])
        }
    };
    Some(query)
}
