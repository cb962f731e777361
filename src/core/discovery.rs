use crate::domain::model::{EntryOrder, ExperimentEntry};
use crate::utils::error::{Result, RunnerError};
use std::ffi::{OsStr, OsString};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_RESULTS_FILE: &str = "results.json";

/// Build the entry for `name` under `root`. Plain path joins, no normalization.
///
/// Paths keep the raw file name bytes; only the display `name` is lossy.
pub fn entry_for(
    root: &Path,
    name: &OsStr,
    config_file: &str,
    results_file: &str,
) -> ExperimentEntry {
    let dir = root.join(name);
    ExperimentEntry {
        name: name.to_string_lossy().into_owned(),
        config_path: dir.join(config_file),
        results_path: dir.join(results_file),
        dir,
    }
}

/// List every direct child of `root`, files and directories alike.
///
/// Fails before yielding anything if `root` is missing or unreadable.
pub async fn discover_experiments(
    root: &Path,
    config_file: &str,
    results_file: &str,
    order: EntryOrder,
) -> Result<Vec<ExperimentEntry>> {
    let dir_error = |source: std::io::Error| RunnerError::ExperimentsDirError {
        path: root.to_path_buf(),
        source,
    };

    let mut listing = tokio::fs::read_dir(root).await.map_err(dir_error)?;

    let mut names: Vec<OsString> = Vec::new();
    while let Some(entry) = listing.next_entry().await.map_err(dir_error)? {
        names.push(entry.file_name());
    }

    if order == EntryOrder::Sorted {
        names.sort();
    }

    tracing::debug!("Discovered {} entries under {}", names.len(), root.display());

    Ok(names
        .iter()
        .map(|name| entry_for(root, name, config_file, results_file))
        .collect())
}
