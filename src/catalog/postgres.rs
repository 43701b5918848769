//! PostgreSQL catalog queries (information_schema + pg_catalog)
//!
//! Every query is scoped to `current_schema()`, so tables with the same name
//! in other schemas never mix.

use super::{Bind, CatalogQuery, MetadataKind};

const TABLE_NAMES: &str = r#"
SELECT
    t.table_name AS table_name
FROM information_schema.tables t
WHERE
    t.table_schema = current_schema()
  AND t.table_catalog = $1
ORDER BY
    t.table_name
"#;

const TABLE_TYPES: &str = r#"
SELECT
    t.table_name AS table_name
  , (CASE t.table_type
         WHEN 'BASE TABLE' THEN 'table'
         WHEN 'VIEW' THEN 'view'
         WHEN 'FOREIGN' THEN 'foreign_table'
         ELSE 'other'
    END) AS table_type
FROM information_schema.tables t
WHERE
    t.table_schema = current_schema()
  AND t.table_catalog = $1
ORDER BY
    table_name
  , table_type
"#;

const COLUMNS: &str = r#"
SELECT
    c.ordinal_position AS sort
  , c.table_catalog AS database_name
  , c.table_schema AS schema_name
  , c.table_name AS table_name
  , c.column_name AS column_name
  , c.data_type AS data_type
  , c.character_maximum_length AS length
  , c.numeric_precision AS precision
  , c.numeric_scale AS scale
  , c.numeric_precision_radix AS radix
  , CASE c.is_nullable WHEN 'YES' THEN 1 ELSE 0 END AS nullable
  , CASE WHEN pk.column_name IS NOT NULL THEN 1 ELSE 0 END AS is_primary
  , CASE WHEN c.column_default LIKE 'nextval%' OR c.is_identity = 'YES' THEN 1 ELSE 0 END AS is_auto_increment
  , CASE WHEN uni.column_name IS NOT NULL THEN 1 ELSE 0 END AS is_unique
  , c.column_default AS "default"
  , pg_catalog.col_description(
        (quote_ident(c.table_schema) || '.' || quote_ident(c.table_name))::regclass::oid
      , c.ordinal_position
    ) AS comment
FROM information_schema.columns c
     LEFT JOIN (
         SELECT DISTINCT
             kcu.table_schema
           , kcu.table_name
           , kcu.column_name
         FROM information_schema.table_constraints tc
              JOIN information_schema.key_column_usage kcu
              ON tc.constraint_schema = kcu.constraint_schema
                  AND tc.constraint_name = kcu.constraint_name
         WHERE tc.constraint_type = 'PRIMARY KEY'
     ) pk
     ON c.table_schema = pk.table_schema
         AND c.table_name = pk.table_name
         AND c.column_name = pk.column_name
     LEFT JOIN (
         SELECT DISTINCT
             kcu.table_schema
           , kcu.table_name
           , kcu.column_name
         FROM information_schema.table_constraints tc
              JOIN information_schema.key_column_usage kcu
              ON tc.constraint_schema = kcu.constraint_schema
                  AND tc.constraint_name = kcu.constraint_name
         WHERE tc.constraint_type = 'UNIQUE'
     ) uni
     ON c.table_schema = uni.table_schema
         AND c.table_name = uni.table_name
         AND c.column_name = uni.column_name
WHERE
    c.table_schema = current_schema()
  AND c.table_catalog = $1
ORDER BY
    c.table_name
  , c.ordinal_position
"#;

const INDEXES: &str = r#"
SELECT
    current_database() AS database_name
  , n.nspname AS schema_name
  , t.relname AS table_name
  , i.relname AS index_name
  , am.amname AS index_type
  , array_to_string(array_agg(a.attname ORDER BY array_position(idx.indkey, a.attnum)), ',') AS column_names
  , CASE WHEN idx.indisunique THEN 1 ELSE 0 END AS is_unique
  , CASE WHEN idx.indisprimary THEN 1 ELSE 0 END AS is_primary
  , obj_description(i.oid, 'pg_class') AS index_comment
FROM pg_class t
     JOIN pg_namespace n ON t.relnamespace = n.oid
     JOIN pg_index idx ON t.oid = idx.indrelid
     JOIN pg_class i ON idx.indexrelid = i.oid
     JOIN pg_am am ON i.relam = am.oid
     JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY (idx.indkey)
WHERE
    t.relkind IN ('r', 'p', 'm')
  AND n.nspname = current_schema()
  AND current_database() = $1
GROUP BY
    n.nspname
  , t.relname
  , i.relname
  , i.oid
  , am.amname
  , idx.indisunique
  , idx.indisprimary
ORDER BY
    table_name
  , index_name
"#;

const TABLE_COMMENTS: &str = r#"
SELECT
    c.relname AS table_name
  , obj_description(c.oid, 'pg_class') AS comment
FROM pg_class c
     JOIN pg_namespace n ON n.oid = c.relnamespace
WHERE
    c.relkind IN ('r', 'p', 'v', 'm', 'f')
  AND n.nspname = current_schema()
  AND current_database() = $1
  AND obj_description(c.oid, 'pg_class') IS NOT NULL
"#;

const COLUMN_COMMENTS: &str = r#"
SELECT
    c.column_name AS column_name
  , col_description(
        (quote_ident(c.table_schema) || '.' || quote_ident(c.table_name))::regclass::oid
      , c.ordinal_position
    ) AS comment
FROM information_schema.columns c
WHERE
    c.table_catalog = $1
  AND c.table_name = $2
  AND c.table_schema = current_schema()
  AND col_description(
        (quote_ident(c.table_schema) || '.' || quote_ident(c.table_name))::regclass::oid
      , c.ordinal_position
    ) IS NOT NULL
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
