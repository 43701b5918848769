//! Markdown dictionary: one document holding the index and a section per
//! table, cross-linked by anchors

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use tracing::debug;

use crate::error::DbDictError;
use crate::model::{DatabaseInfo, TableInfo};
use crate::util::yes_no;

use super::{
    fill_template, length_text, numeric_text, OutputFormat, OutputTarget, Progress, RenderUnit,
    Renderer,
};

const DATABASE_TEMPLATE: &str = include_str!("../../templates/db_dict_database.md");
const TABLE_TEMPLATE: &str = include_str!("../../templates/db_dict_table.md");

/// Anchor of the index section
pub(crate) fn database_anchor(database_name: &str) -> String {
    format!("database-{}", anchor_slug(database_name))
}

/// Anchor of a table section
pub(crate) fn table_anchor(table_name: &str) -> String {
    format!("table-{}", anchor_slug(table_name))
}

fn anchor_slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Make text safe inside a table cell
fn escape_cell(text: &str) -> String {
    text.replace('\r', "")
        .replace('|', "\\|")
        .replace('\n', "<br>")
}

pub struct MarkdownRenderer {
    target: OutputTarget,
    path: PathBuf,
}

impl MarkdownRenderer {
    pub fn new(target: OutputTarget) -> Self {
        let path = target.path(OutputFormat::Markdown);
        Self { target, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn render_database(&self, database: &DatabaseInfo) -> Result<String> {
        let rows: Vec<String> = database
            .selected_tables()
            .enumerate()
            .map(|(i, table)| {
                format!(
                    "| {} | [{}](#{}) | {} | {} |",
                    i + 1,
                    escape_cell(&table.name),
                    table_anchor(&table.name),
                    escape_cell(table.table_type.as_str()),
                    escape_cell(&table.comment),
                )
            })
            .collect();

        let anchor = database_anchor(&database.database_name);
        let selected = database.selected_table_count().to_string();
        let total = database.table_count().to_string();
        let generated = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        let table_rows = rows.join("\n");

        fill_template(
            DATABASE_TEMPLATE,
            &[
                ("anchor", anchor.as_str()),
                ("database_name", database.database_name.as_str()),
                ("selected_count", selected.as_str()),
                ("table_count", total.as_str()),
                ("generated_at", generated.as_str()),
                ("table_rows", table_rows.as_str()),
            ],
        )
    }

    fn render_table(&self, table: &TableInfo) -> Result<String> {
        let column_rows: Vec<String> = table
            .columns
            .iter()
            .map(|c| {
                format!(
                    "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                    c.ordinal,
                    escape_cell(&c.name),
                    escape_cell(&c.data_type),
                    length_text(c),
                    numeric_text(c),
                    yes_no(c.is_nullable),
                    escape_cell(c.default_value.as_deref().unwrap_or_default()),
                    yes_no(c.is_primary),
                    yes_no(c.is_auto_increment),
                    yes_no(c.is_unique),
                    escape_cell(&c.comment),
                )
            })
            .collect();

        let index_rows: Vec<String> = table
            .indexes
            .iter()
            .enumerate()
            .map(|(i, index)| {
                format!(
                    "| {} | {} | {} | {} | {} | {} | {} |",
                    i + 1,
                    escape_cell(&index.name),
                    escape_cell(&index.columns_joined(", ")),
                    escape_cell(&index.index_type),
                    yes_no(index.is_primary),
                    yes_no(index.is_unique),
                    escape_cell(&index.comment),
                )
            })
            .collect();

        let anchor = table_anchor(&table.name);
        let index_anchor = database_anchor(&table.database_name);
        let table_type = escape_cell(table.table_type.as_str());
        let comment = escape_cell(&table.comment);
        let column_rows = column_rows.join("\n");
        let index_rows = index_rows.join("\n");

        fill_template(
            TABLE_TEMPLATE,
            &[
                ("anchor", anchor.as_str()),
                ("table_name", table.name.as_str()),
                ("database_name", table.database_name.as_str()),
                ("index_anchor", index_anchor.as_str()),
                ("table_type", table_type.as_str()),
                ("comment", comment.as_str()),
                ("column_rows", column_rows.as_str()),
                ("index_rows", index_rows.as_str()),
            ],
        )
    }

    fn write(&self, content: &str, append: bool) -> Result<()> {
        let mut options = OpenOptions::new();
        if append {
            options.append(true).create(true);
        } else {
            options.write(true).create_new(true);
        }

        let mut file = options
            .open(&self.path)
            .map_err(|e| DbDictError::OutputWrite {
                path: self.path.clone(),
                source: e,
            })?;
        file.write_all(content.as_bytes())
            .map_err(|e| DbDictError::OutputWrite {
                path: self.path.clone(),
                source: e,
            })?;
        Ok(())
    }
}

impl Renderer for MarkdownRenderer {
    fn render(
        &mut self,
        unit: RenderUnit<'_>,
        progress: Progress,
        _is_last: bool,
    ) -> Result<PathBuf> {
        match unit {
            RenderUnit::Database(database) => {
                self.target.claim(&self.path)?;
                let content = self.render_database(database)?;
                self.write(&content, false)?;
            }
            RenderUnit::Table(table) => {
                let content = self.render_table(table)?;
                self.write(&content, true)?;
            }
        }

        debug!(
            unit = unit.display_name(),
            %progress,
            path = %self.path.display(),
            "rendered markdown"
        );
        Ok(self.path.clone())
    }
}
