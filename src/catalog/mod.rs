//! Dialect query catalog
//!
//! Fixed, per-vendor query text for every kind of metadata the dictionary
//! needs. Each query is written in the vendor's native positional placeholder
//! syntax (`?`, `$1`, `@P1`, `:1`) and declares which values are bound to its
//! placeholders, in order, through [`CatalogQuery::binds`].
//!
//! Every query returns columns under the same lowercase aliases so rows can be
//! decoded without knowing which vendor produced them:
//!
//! | kind            | columns                                                     |
//! |-----------------|-------------------------------------------------------------|
//! | table names     | `table_name`                                                |
//! | table types     | `table_name`, `table_type`                                  |
//! | columns         | `sort`, `database_name`, `schema_name`, `table_name`,       |
//! |                 | `column_name`, `data_type`, `length`, `precision`, `scale`, |
//! |                 | `radix`, `nullable`, `is_primary`, `is_auto_increment`,     |
//! |                 | `is_unique`, `default`, `comment`                           |
//! | indexes         | `database_name`, `schema_name`, `table_name`, `index_name`, |
//! |                 | `index_type`, `column_names`, `is_unique`, `is_primary`,    |
//! |                 | `index_comment`                                             |
//! | table comments  | `table_name`, `comment`                                     |
//! | column comments | `column_name`, `comment`                                    |

mod mysql;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

use std::fmt;
use std::str::FromStr;

use crate::error::DbDictError;

/// Supported database vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    MySql,
    Postgres,
    SqlServer,
    Oracle,
    Sqlite,
}

impl Vendor {
    /// All supported vendors
    pub const ALL: [Vendor; 5] = [
        Vendor::MySql,
        Vendor::Postgres,
        Vendor::SqlServer,
        Vendor::Oracle,
        Vendor::Sqlite,
    ];

    /// Canonical identifier
    pub fn id(&self) -> &'static str {
        match self {
            Vendor::MySql => "mysql",
            Vendor::Postgres => "postgres",
            Vendor::SqlServer => "sqlserver",
            Vendor::Oracle => "oracle",
            Vendor::Sqlite => "sqlite",
        }
    }

    /// Whether databases of this vendor live in a self-contained local file
    /// with no server-side database name of their own.
    pub fn is_file_based(&self) -> bool {
        matches!(self, Vendor::Sqlite)
    }

    /// Whether the bulk column query already carries column comments.
    ///
    /// SQL Server keeps them as per-object extended properties, which are
    /// read one table at a time instead.
    pub fn bulk_column_comments(&self) -> bool {
        matches!(self, Vendor::MySql | Vendor::Postgres | Vendor::Oracle)
    }

    /// Look up the query for a metadata kind.
    ///
    /// Returns `None` when the vendor has no catalog support for that kind;
    /// callers treat this as an empty result and never execute a blank query.
    pub fn query(&self, kind: MetadataKind) -> Option<CatalogQuery> {
        match self {
            Vendor::MySql => mysql::query(kind),
            Vendor::Postgres => postgres::query(kind),
            Vendor::SqlServer => sqlserver::query(kind),
            Vendor::Oracle => oracle::query(kind),
            Vendor::Sqlite => sqlite::query(kind),
        }
    }

    /// Metadata kinds this vendor has queries for
    pub fn supported_kinds(&self) -> Vec<MetadataKind> {
        MetadataKind::ALL
            .into_iter()
            .filter(|kind| self.query(*kind).is_some())
            .collect()
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Vendor {
    type Err = DbDictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Vendor::MySql),
            "postgres" | "postgresql" | "postgressql" | "pg" => Ok(Vendor::Postgres),
            "sqlserver" | "mssql" => Ok(Vendor::SqlServer),
            "oracle" => Ok(Vendor::Oracle),
            "sqlite" | "sqlite3" => Ok(Vendor::Sqlite),
            _ => Err(DbDictError::UnknownVendor {
                name: s.to_string(),
            }),
        }
    }
}

/// Kinds of metadata fetched from a vendor catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    /// Names of every table and view in the database
    TableNames,
    /// Table name to `table` / `view` / vendor-specific tag
    TableTypes,
    /// Column metadata for every table
    Columns,
    /// Index metadata for every table
    Indexes,
    /// Table name to table comment
    TableComments,
    /// Column name to column comment, for one table
    ColumnComments,
}

impl MetadataKind {
    pub const ALL: [MetadataKind; 6] = [
        MetadataKind::TableNames,
        MetadataKind::TableTypes,
        MetadataKind::Columns,
        MetadataKind::Indexes,
        MetadataKind::TableComments,
        MetadataKind::ColumnComments,
    ];
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetadataKind::TableNames => "table names",
            MetadataKind::TableTypes => "table types",
            MetadataKind::Columns => "columns",
            MetadataKind::Indexes => "indexes",
            MetadataKind::TableComments => "table comments",
            MetadataKind::ColumnComments => "column comments",
        };
        f.write_str(name)
    }
}

/// A value bound to a query placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bind {
    /// The target database (catalog / schema / owner) name
    Database,
    /// The table currently being inspected
    Table,
}

/// Query text plus the ordered list of values bound to its placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogQuery {
    pub sql: &'static str,
    pub binds: &'static [Bind],
}

impl CatalogQuery {
    pub(crate) const fn new(sql: &'static str, binds: &'static [Bind]) -> Self {
        Self { sql, binds }
    }

    /// Resolve the bind list against concrete values.
    pub fn params<'a>(&self, database: &'a str, table: Option<&'a str>) -> Vec<&'a str> {
        self.binds
            .iter()
            .map(|bind| match bind {
                Bind::Database => database,
                Bind::Table => table.unwrap_or_default(),
            })
            .collect()
    }
}
