use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Archives the mod loaders pick up.
pub const DEFAULT_ARCHIVE_PATTERN: &str = "*.jar";

/// Find all mod archives directly inside `dir`.
///
/// Subdirectories are not descended into. Results are sorted by filename so a
/// run over the same directory always processes packages in the same order.
#[tracing::instrument(skip(runtime))]
pub fn find_archives<R: Runtime>(runtime: &R, dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern =
        Pattern::new(pattern).with_context(|| format!("Invalid archive pattern: {}", pattern))?;
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    if !runtime.exists(dir) {
        warn!("Mods directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut archives: Vec<PathBuf> = runtime
        .read_dir(dir)?
        .into_iter()
        .filter(|path| match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => pattern.matches_with(name, options),
            None => {
                warn!("Skipping {}: the file name is not valid UTF-8", path.display());
                false
            }
        })
        .filter(|path| runtime.is_file(path))
        .collect();

    archives.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Found {} archive(s) in {}", archives.len(), dir.display());

    Ok(archives)
}
