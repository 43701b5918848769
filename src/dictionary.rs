//! Build orchestrator: render the index, then every selected table

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::error::DbDictError;
use crate::model::DatabaseInfo;
use crate::render::{renderer_for, OutputFormat, OutputTarget, Progress, RenderUnit};

/// Options for one dictionary build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory the document is written to; created when missing
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Replace an existing document
    pub overwrite: bool,
    /// Source file of a self-contained local database, used to name the
    /// output
    pub source_file: Option<PathBuf>,
}

/// Render the dictionary for the selected tables of `database`.
///
/// Returns the distinct output paths in the order they were first written.
pub fn build_all(database: &DatabaseInfo, options: &BuildOptions) -> Result<Vec<PathBuf>> {
    build_all_with_progress(database, options, |_| {})
}

/// Like [`build_all`], reporting each unit's progress before it is rendered.
///
/// The index unit comes first; if it fails the build stops. A failing table
/// unit is logged and skipped.
pub fn build_all_with_progress<F>(
    database: &DatabaseInfo,
    options: &BuildOptions,
    mut on_progress: F,
) -> Result<Vec<PathBuf>>
where
    F: FnMut(Progress),
{
    if options.output_dir.as_os_str().is_empty() {
        return Err(DbDictError::MissingOutputDirectory.into());
    }

    let target = OutputTarget::new(
        &options.output_dir,
        &database.database_name,
        options.source_file.as_deref(),
        options.overwrite,
    );
    let mut renderer = renderer_for(options.format, target);

    let total = database.selected_table_count() + 1;
    let mut paths: Vec<PathBuf> = Vec::new();

    info!(
        database = %database.database_name,
        format = %options.format,
        tables = total - 1,
        "building dictionary"
    );

    // Step 1: index unit
    let progress = Progress { current: 1, total };
    on_progress(progress);
    let path = renderer.render(RenderUnit::Database(database), progress, progress.is_last())?;
    paths.push(path);

    // Step 2: one unit per selected table, alphabetically
    let mut skipped = 0;
    for (i, table) in database.selected_tables().enumerate() {
        let progress = Progress {
            current: i + 2,
            total,
        };
        on_progress(progress);

        match renderer.render(RenderUnit::Table(table), progress, progress.is_last()) {
            Ok(path) => {
                if !paths.contains(&path) {
                    paths.push(path);
                }
            }
            Err(e) => {
                skipped += 1;
                warn!(table = %table.name, %progress, error = %e, "skipping table");
            }
        }
    }

    debug!(outputs = paths.len(), skipped, "dictionary build finished");
    info!(
        database = %database.database_name,
        rendered = total - skipped,
        skipped,
        "dictionary written"
    );

    Ok(paths)
}
