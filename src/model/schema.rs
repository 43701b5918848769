//! Vendor-neutral schema types

use std::collections::BTreeMap;
use std::fmt;

/// A single column of a table or view
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnInfo {
    /// 1-based position within the table
    pub ordinal: i64,
    pub database_name: String,
    pub schema_name: String,
    pub table_name: String,
    pub name: String,
    /// Declared data type as reported by the catalog
    pub data_type: String,
    pub length: Option<i64>,
    pub precision: Option<i64>,
    pub scale: Option<i64>,
    pub radix: Option<i64>,
    pub is_nullable: bool,
    pub is_primary: bool,
    pub is_auto_increment: bool,
    pub is_unique: bool,
    pub default_value: Option<String>,
    pub comment: String,
}

/// An index defined on a table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexInfo {
    pub database_name: String,
    pub schema_name: String,
    pub table_name: String,
    pub name: String,
    /// Participating columns in index key order
    pub column_names: Vec<String>,
    pub is_unique: bool,
    pub is_primary: bool,
    /// Vendor label such as BTREE, NONCLUSTERED or `unique`
    pub index_type: String,
    pub comment: String,
}

impl IndexInfo {
    /// Column names joined with `separator`, in key order
    pub fn columns_joined(&self, separator: &str) -> String {
        self.column_names.join(separator)
    }
}

/// Kind of schema object a [`TableInfo`] describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableType {
    Table,
    View,
    /// Vendor-specific tag (`sys_view`, `foreign_table`, ...) or `other`
    Other(String),
}

impl TableType {
    /// Tag used when the catalog did not report a type
    pub const OTHER: &'static str = "other";

    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "table" => TableType::Table,
            "view" => TableType::View,
            "" => TableType::Other(Self::OTHER.to_string()),
            other => TableType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TableType::Table => "table",
            TableType::View => "view",
            TableType::Other(tag) => tag,
        }
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table or view with its columns and indexes
#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub database_name: String,
    pub name: String,
    pub table_type: TableType,
    pub comment: String,
    /// Columns ordered by ordinal position
    pub columns: Vec<ColumnInfo>,
    /// Indexes in catalog order
    pub indexes: Vec<IndexInfo>,
}

/// The whole database: every table keyed by name, plus the selection used
/// to scope rendering
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseInfo {
    pub database_name: String,
    tables: BTreeMap<String, TableInfo>,
    selected: Option<Vec<String>>,
}

impl DatabaseInfo {
    pub fn new(database_name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            tables: BTreeMap::new(),
            selected: None,
        }
    }

    pub fn add_table(&mut self, table: TableInfo) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn table(&self, name: &str) -> Option<&TableInfo> {
        self.tables.get(name)
    }

    /// All table names in alphabetical order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }

    /// All tables in alphabetical order of name
    pub fn tables(&self) -> impl Iterator<Item = &TableInfo> {
        self.tables.values()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Restrict rendering to the given tables.
    ///
    /// Names that are not in the database are dropped silently, as are
    /// repeats; the remaining names keep the caller's order. An empty list
    /// selects nothing.
    pub fn set_selected_table_names<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if self.tables.contains_key(name) && !selected.iter().any(|s| s == name) {
                selected.push(name.to_string());
            }
        }
        self.selected = Some(selected);
    }

    /// Select every table again
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Selected table names: the caller's order when a selection was set,
    /// otherwise every table alphabetically.
    pub fn selected_table_names(&self) -> Vec<&str> {
        match &self.selected {
            Some(selected) => selected.iter().map(|s| s.as_str()).collect(),
            None => self.table_names(),
        }
    }

    /// Selected tables in alphabetical order of name
    pub fn selected_tables(&self) -> impl Iterator<Item = &TableInfo> {
        self.tables.values().filter(move |table| match &self.selected {
            Some(selected) => selected.iter().any(|s| *s == table.name),
            None => true,
        })
    }

    pub fn selected_table_count(&self) -> usize {
        match &self.selected {
            Some(selected) => selected.len(),
            None => self.tables.len(),
        }
    }
}
