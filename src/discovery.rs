use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Recursively collect files under `root` whose name ends in `.{extension}`,
/// compared case-insensitively. Hidden files and directories are included,
/// and so are symlinks that point at files.
///
/// Entries are visited in file-name order so runs are repeatable. A missing
/// root yields no files and an unreadable root is an error. Unreadable
/// entries below the root are logged and skipped.
pub fn find_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        log::warn!("Data directory {} does not exist", root.display());
        return Ok(Vec::new());
    }

    let suffix = format!(".{}", extension.trim_start_matches('.').to_lowercase());
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(e).with_context(|| format!("walking {}", root.display()));
            }
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {e}", root.display());
                continue;
            }
        };
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.ends_with(&suffix) {
            files.push(entry.into_path());
        }
    }

    log::debug!("Found {} file(s) under {}", files.len(), root.display());
    Ok(files)
}
