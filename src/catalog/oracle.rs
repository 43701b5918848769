//! Oracle catalog queries (ALL_* dictionary views)
//!
//! The "database" bound here is the owning schema (user). Oracle binds
//! positional placeholders by occurrence, so repeated values are listed once
//! per placeholder.

use super::{Bind, CatalogQuery, MetadataKind};

const TABLE_NAMES: &str = r#"
SELECT
    t.OBJECT_NAME AS "table_name"
FROM ALL_OBJECTS t
WHERE
    t.OWNER = UPPER(:1)
  AND t.OBJECT_TYPE IN ('TABLE', 'VIEW')
ORDER BY
    t.OBJECT_NAME
"#;

const TABLE_TYPES: &str = r#"
SELECT
    t.OBJECT_NAME AS "table_name"
  , (CASE t.OBJECT_TYPE
         WHEN 'TABLE' THEN 'table'
         WHEN 'VIEW' THEN 'view'
         ELSE 'other'
    END) AS "table_type"
FROM ALL_OBJECTS t
WHERE
    t.OWNER = UPPER(:1)
  AND t.OBJECT_TYPE IN ('TABLE', 'VIEW')
ORDER BY
    "table_name"
  , "table_type"
"#;

// ALL_TAB_IDENTITY_COLS requires Oracle 12c or later.
const COLUMNS: &str = r#"
SELECT
    tc.COLUMN_ID AS "sort"
  , SYS_CONTEXT('USERENV', 'DB_NAME') AS "database_name"
  , tc.OWNER AS "schema_name"
  , tc.TABLE_NAME AS "table_name"
  , tc.COLUMN_NAME AS "column_name"
  , tc.DATA_TYPE AS "data_type"
  , tc.CHAR_LENGTH AS "length"
  , tc.DATA_PRECISION AS "precision"
  , tc.DATA_SCALE AS "scale"
  , NULL AS "radix"
  , CASE tc.NULLABLE WHEN 'Y' THEN 1 ELSE 0 END AS "nullable"
  , CASE WHEN pk.COLUMN_NAME IS NOT NULL THEN 1 ELSE 0 END AS "is_primary"
  , CASE WHEN idc.COLUMN_NAME IS NOT NULL THEN 1 ELSE 0 END AS "is_auto_increment"
  , CASE WHEN uc.COLUMN_NAME IS NOT NULL THEN 1 ELSE 0 END AS "is_unique"
  , tc.DATA_DEFAULT AS "default"
  , cc.COMMENTS AS "comment"
FROM ALL_TAB_COLUMNS tc
     LEFT JOIN (
         SELECT DISTINCT
             ccu.TABLE_NAME
           , ccu.COLUMN_NAME
         FROM ALL_CONSTRAINTS cons
              JOIN ALL_CONS_COLUMNS ccu
              ON cons.CONSTRAINT_NAME = ccu.CONSTRAINT_NAME AND cons.OWNER = ccu.OWNER
         WHERE
             cons.CONSTRAINT_TYPE = 'P'
           AND cons.OWNER = UPPER(:1)
     ) pk
     ON tc.TABLE_NAME = pk.TABLE_NAME AND tc.COLUMN_NAME = pk.COLUMN_NAME
     LEFT JOIN (
         SELECT DISTINCT
             ccu.TABLE_NAME
           , ccu.COLUMN_NAME
         FROM ALL_CONSTRAINTS cons
              JOIN ALL_CONS_COLUMNS ccu
              ON cons.CONSTRAINT_NAME = ccu.CONSTRAINT_NAME AND cons.OWNER = ccu.OWNER
         WHERE
             cons.CONSTRAINT_TYPE = 'U'
           AND cons.OWNER = UPPER(:2)
     ) uc
     ON tc.TABLE_NAME = uc.TABLE_NAME AND tc.COLUMN_NAME = uc.COLUMN_NAME
     LEFT JOIN ALL_TAB_IDENTITY_COLS idc
     ON tc.TABLE_NAME = idc.TABLE_NAME AND tc.COLUMN_NAME = idc.COLUMN_NAME AND tc.OWNER = idc.OWNER
     LEFT JOIN ALL_COL_COMMENTS cc
     ON tc.TABLE_NAME = cc.TABLE_NAME AND tc.COLUMN_NAME = cc.COLUMN_NAME AND tc.OWNER = cc.OWNER
WHERE
    tc.OWNER = UPPER(:3)
ORDER BY
    "table_name"
  , "sort"
"#;

const INDEXES: &str = r#"
SELECT
    SYS_CONTEXT('USERENV', 'DB_NAME') AS "database_name"
  , ai.OWNER AS "schema_name"
  , ai.TABLE_NAME AS "table_name"
  , ai.INDEX_NAME AS "index_name"
  , ai.INDEX_TYPE AS "index_type"
  , LISTAGG(aic.COLUMN_NAME, ',') WITHIN GROUP (ORDER BY aic.COLUMN_POSITION) AS "column_names"
  , CASE WHEN ai.UNIQUENESS = 'UNIQUE' THEN 1 ELSE 0 END AS "is_unique"
  , CASE
        WHEN EXISTS (
            SELECT 1
            FROM ALL_CONSTRAINTS ac
            WHERE
                ac.OWNER = ai.OWNER
              AND ac.TABLE_NAME = ai.TABLE_NAME
              AND ac.CONSTRAINT_TYPE = 'P'
              AND ac.INDEX_NAME = ai.INDEX_NAME
        ) THEN 1
        ELSE 0
    END AS "is_primary"
  , NULL AS "index_comment"
FROM ALL_INDEXES ai
     JOIN ALL_IND_COLUMNS aic
     ON ai.INDEX_NAME = aic.INDEX_NAME
         AND ai.TABLE_NAME = aic.TABLE_NAME
         AND ai.OWNER = aic.INDEX_OWNER
WHERE
    ai.OWNER = UPPER(:1)
GROUP BY
    ai.OWNER
  , ai.TABLE_NAME
  , ai.INDEX_NAME
  , ai.INDEX_TYPE
  , ai.UNIQUENESS
ORDER BY
    "table_name"
  , "index_name"
"#;

const TABLE_COMMENTS: &str = r#"
SELECT
    t.TABLE_NAME AS "table_name"
  , t.COMMENTS AS "comment"
FROM ALL_TAB_COMMENTS t
WHERE
    t.OWNER = UPPER(:1)
  AND t.COMMENTS IS NOT NULL
"#;

const COLUMN_COMMENTS: &str = r#"
SELECT
    c.COLUMN_NAME AS "column_name"
  , c.COMMENTS AS "comment"
FROM ALL_COL_COMMENTS c
WHERE
    c.OWNER = UPPER(:1)
  AND c.TABLE_NAME = :2
  AND c.COMMENTS IS NOT NULL
"#;

pub(super) fn query(kind: MetadataKind) -> Option<CatalogQuery> {
    let query = match kind {
        MetadataKind::TableNames => CatalogQuery::new(TABLE_NAMES, &[Bind::Database]),
        MetadataKind::TableTypes => CatalogQuery::new(TABLE_TYPES, &[Bind::Database]),
        MetadataKind::Columns => CatalogQuery::new(
            COLUMNS,
            &[Bind::Database, Bind::Database, Bind::Database],
        ),
        MetadataKind::Indexes => CatalogQuery::new(INDEXES, &[Bind::Database]),
        MetadataKind::TableComments => CatalogQuery::new(TABLE_COMMENTS, &[Bind::Database]),
        MetadataKind::ColumnComments => {
            CatalogQuery::new(COLUMN_COMMENTS, &[Bind::Database, Bind::Table])
        }
    };
    Some(query)
}
