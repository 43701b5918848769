//! SQLite catalog queries (sqlite_master + pragma table-valued functions)
//!
//! SQLite has no comment storage, so comment queries are unsupported. Every
//! query targets the `main` schema of the open file and binds nothing.

use super::{CatalogQuery, MetadataKind};

const TABLE_NAMES: &str = r#"
SELECT
    m.name AS table_name
FROM sqlite_master m
WHERE
    m.type IN ('table', 'view')
  AND m.name NOT LIKE 'sqlite\_%' ESCAPE '\'
ORDER BY
    m.name
"#;

const TABLE_TYPES: &str = r#"
SELECT
    m.name AS table_name
  , m.type AS table_type
FROM sqlite_master m
WHERE
    m.type IN ('table', 'view')
  AND m.name NOT LIKE 'sqlite\_%' ESCAPE '\'
ORDER BY
    table_name
  , table_type
"#;

// Length, precision and scale are left to the declared type, e.g. VARCHAR(32).
const COLUMNS: &str = r#"
SELECT
    p.cid + 1 AS sort
  , 'main' AS database_name
  , 'main' AS schema_name
  , m.name AS table_name
  , p.name AS column_name
  , p.type AS data_type
  , NULL AS length
  , NULL AS "precision"
  , NULL AS scale
  , 10 AS radix
  , CASE WHEN p."notnull" = 0 AND p.pk = 0 THEN 1 ELSE 0 END AS nullable
  , CASE WHEN p.pk > 0 THEN 1 ELSE 0 END AS is_primary
  , CASE
        WHEN p.pk > 0
         AND UPPER(p.type) = 'INTEGER'
         AND (SELECT COUNT(*) FROM pragma_table_info(m.name) k WHERE k.pk > 0) = 1
        THEN 1
        ELSE 0
    END AS is_auto_increment
  , CASE
        WHEN EXISTS (
            SELECT 1
            FROM pragma_index_list(m.name) il
            WHERE
                il."unique" = 1
              AND il.origin <> 'pk'
              AND (SELECT COUNT(*) FROM pragma_index_info(il.name)) = 1
              AND (SELECT ii.name FROM pragma_index_info(il.name) ii) = p.name
        ) THEN 1
        ELSE 0
    END AS is_unique
  , p.dflt_value AS "default"
  , NULL AS comment
FROM sqlite_master m
     JOIN pragma_table_info(m.name) p
WHERE
    m.type IN ('table', 'view')
  AND m.name NOT LIKE 'sqlite\_%' ESCAPE '\'
ORDER BY
    m.name
  , p.cid
"#;

const INDEXES: &str = r#"
SELECT
    'main' AS database_name
  , 'main' AS schema_name
  , m.name AS table_name
  , il.name AS index_name
  , CASE il.origin
        WHEN 'pk' THEN 'primary key'
        WHEN 'u' THEN 'unique'
        ELSE 'index'
    END AS index_type
  , (SELECT group_concat(ii.name, ',') FROM pragma_index_info(il.name) ii) AS column_names
  , il."unique" AS is_unique
  , CASE WHEN il.origin = 'pk' THEN 1 ELSE 0 END AS is_primary
  , NULL AS index_comment
FROM sqlite_master m
     JOIN pragma_index_list(m.name) il
WHERE
    m.type = 'table'
  AND m.name NOT LIKE 'sqlite\_%' ESCAPE '\'
ORDER BY
    table_name
  , index_name
"#;

pub(super) fn query(kind: MetadataKind) -> Option<CatalogQuery> {
    match kind {
        MetadataKind::TableNames => Some(CatalogQuery::new(TABLE_NAMES, &[])),
        MetadataKind::TableTypes => Some(CatalogQuery::new(TABLE_TYPES, &[])),
        MetadataKind::Columns => Some(CatalogQuery::new(COLUMNS, &[])),
        MetadataKind::Indexes => Some(CatalogQuery::new(INDEXES, &[])),
        MetadataKind::TableComments | MetadataKind::ColumnComments => None,
    }
}
