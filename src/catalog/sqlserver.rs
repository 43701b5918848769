//! SQL Server catalog queries (sys.* views + INFORMATION_SCHEMA)
//!
//! Comments live in `sys.extended_properties` under `MS_Description`. Column
//! comments are read per table, so the bulk column query leaves them null.
//! Every query is scoped to the caller's default schema.

use super::{Bind, CatalogQuery, MetadataKind};

const TABLE_NAMES: &str = r#"
SELECT
    o.name AS table_name
FROM sys.objects o
WHERE
    o.type IN ('U', 'V')
  AND o.is_ms_shipped = 0
  AND o.schema_id = SCHEMA_ID()
  AND DB_NAME() = @P1
ORDER BY
    o.name
"#;

const TABLE_TYPES: &str = r#"
SELECT
    o.name AS table_name
  , (CASE o.type_desc
         WHEN 'VIEW' THEN 'view'
         WHEN 'USER_TABLE' THEN 'table'
         ELSE 'other'
    END) AS table_type
FROM sys.objects o
WHERE
    o.type IN ('U', 'V')
  AND o.schema_id = SCHEMA_ID()
  AND DB_NAME() = @P1
ORDER BY
    table_name
  , table_type
"#;

const COLUMNS: &str = r#"
SELECT
    c.ORDINAL_POSITION AS [sort]
  , c.TABLE_CATALOG AS database_name
  , c.TABLE_SCHEMA AS schema_name
  , c.TABLE_NAME AS table_name
  , c.COLUMN_NAME AS column_name
  , c.DATA_TYPE AS data_type
  , c.CHARACTER_MAXIMUM_LENGTH AS [length]
  , c.NUMERIC_PRECISION AS [precision]
  , c.NUMERIC_SCALE AS scale
  , c.NUMERIC_PRECISION_RADIX AS radix
  , CASE c.IS_NULLABLE WHEN 'YES' THEN 1 ELSE 0 END AS nullable
  , CASE WHEN pk.COLUMN_NAME IS NOT NULL THEN 1 ELSE 0 END AS is_primary
  , CASE COLUMNPROPERTY(OBJECT_ID(QUOTENAME(c.TABLE_SCHEMA) + '.' + QUOTENAME(c.TABLE_NAME)), c.COLUMN_NAME, 'IsIdentity')
        WHEN 1 THEN 1
        ELSE 0 END AS is_auto_increment
  , CASE WHEN uni.COLUMN_NAME IS NOT NULL THEN 1 ELSE 0 END AS is_unique
  , c.COLUMN_DEFAULT AS [default]
  , CAST(NULL AS NVARCHAR(4000)) AS comment
FROM INFORMATION_SCHEMA.COLUMNS c
     LEFT JOIN (
         SELECT DISTINCT
             kcu.TABLE_SCHEMA
           , kcu.TABLE_NAME
           , kcu.COLUMN_NAME
         FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc
              JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu
              ON tc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME
                  AND tc.CONSTRAINT_SCHEMA = kcu.CONSTRAINT_SCHEMA
         WHERE tc.CONSTRAINT_TYPE = 'PRIMARY KEY'
     ) pk
     ON c.TABLE_SCHEMA = pk.TABLE_SCHEMA
         AND c.TABLE_NAME = pk.TABLE_NAME
         AND c.COLUMN_NAME = pk.COLUMN_NAME
     LEFT JOIN (
         SELECT DISTINCT
             kcu.TABLE_SCHEMA
           , kcu.TABLE_NAME
           , kcu.COLUMN_NAME
         FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc
              JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu
              ON tc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME
                  AND tc.CONSTRAINT_SCHEMA = kcu.CONSTRAINT_SCHEMA
         WHERE tc.CONSTRAINT_TYPE = 'UNIQUE'
     ) uni
     ON c.TABLE_SCHEMA = uni.TABLE_SCHEMA
         AND c.TABLE_NAME = uni.TABLE_NAME
         AND c.COLUMN_NAME = uni.COLUMN_NAME
WHERE
    c.TABLE_CATALOG = @P1
  AND c.TABLE_SCHEMA = SCHEMA_NAME()
ORDER BY
    c.TABLE_NAME
  , c.ORDINAL_POSITION
"#;

const INDEXES: &str = r#"
SELECT
    DB_NAME() AS database_name
  , sc.name AS schema_name
  , t.name AS table_name
  , i.name AS index_name
  , i.type_desc AS index_type
  , STUFF((
        SELECT
            ',' + col.name
        FROM sys.index_columns ic
             INNER JOIN sys.columns col
             ON ic.object_id = col.object_id
                 AND ic.column_id = col.column_id
        WHERE
            ic.object_id = i.object_id
          AND ic.index_id = i.index_id
          AND ic.is_included_column = 0
        ORDER BY
            ic.key_ordinal
        FOR XML PATH('')
    ), 1, 1, '') AS column_names
  , CAST(i.is_unique AS INT) AS is_unique
  , CAST(i.is_primary_key AS INT) AS is_primary
  , CAST(ep.value AS NVARCHAR(4000)) AS index_comment
FROM sys.tables t
     LEFT JOIN sys.schemas sc
     ON t.schema_id = sc.schema_id
     INNER JOIN sys.indexes i
     ON t.object_id = i.object_id
     LEFT JOIN sys.extended_properties ep
     ON ep.major_id = t.object_id
         AND ep.minor_id = i.index_id
         AND ep.class = 7
         AND ep.name = 'MS_Description'
WHERE
    t.type = 'U'
  AND i.type <> 0
  AND t.schema_id = SCHEMA_ID()
  AND DB_NAME() = @P1
ORDER BY
    table_name
  , index_name
"#;

const TABLE_COMMENTS: &str = r#"
SELECT
    o.name AS table_name
  , CAST(ISNULL(ep.value, '') AS NVARCHAR(4000)) AS comment
FROM sys.objects o
     LEFT JOIN sys.extended_properties ep
     ON ep.major_id = o.object_id
         AND ep.minor_id = 0
         AND ep.name = 'MS_Description'
WHERE
    o.type IN ('U', 'V')
  AND o.is_ms_shipped = 0
  AND o.schema_id = SCHEMA_ID()
  AND DB_NAME() = @P1
"#;

const COLUMN_COMMENTS: &str = r#"
SELECT
    c.name AS column_name
  , CAST(ISNULL(ep.value, '') AS NVARCHAR(4000)) AS comment
FROM sys.columns c
     LEFT JOIN sys.extended_properties ep
     ON ep.major_id = c.object_id
         AND ep.minor_id = c.column_id
         AND ep.name = 'MS_Description'
WHERE
    DB_NAME() = @P1
  AND c.object_id = OBJECT_ID(QUOTENAME(SCHEMA_NAME()) + '.' + QUOTENAME(@P2))
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
