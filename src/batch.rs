use std::fs;
use std::io;
use std::path::Path;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::config::Layout;
use crate::convert::{convert_in_place, log_result, transpose_file};
use crate::data::model::Dataset;
use crate::discovery::find_files;
use crate::report::{BatchReport, Cleanup, FileOutcome, Outcome, RunSummary};

// ---------------------------------------------------------------------------
// Run options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Datasets to process, in order.
    pub datasets: Vec<Dataset>,
    /// Transpose in memory only; never write, move or delete.
    pub dry_run: bool,
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            datasets: Dataset::ALL.to_vec(),
            dry_run: false,
            show_progress: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Batch run
// ---------------------------------------------------------------------------

/// Convert every matching file under each dataset root, quarantine failures,
/// then drop the quarantine directory if nothing ended up in it.
///
/// Only discovery errors are returned; per-file problems become outcomes.
pub fn run(layout: &Layout, options: &RunOptions) -> Result<RunSummary> {
    let mut report = BatchReport::default();

    for &dataset in &options.datasets {
        let root = dataset_root(layout, dataset);
        let files = find_files(root, &layout.extension)?;
        log::info!("{dataset}: {} file(s) under {}", files.len(), root.display());

        let progress = progress_bar(files.len(), dataset, options.show_progress);
        let outcomes: Vec<FileOutcome> = files
            .iter()
            .map(|path| {
                let outcome =
                    process_file(dataset, root, path, &layout.quarantine_dir, options.dry_run);
                progress.inc(1);
                outcome
            })
            .collect();
        progress.finish_and_clear();

        report.extend(outcomes);
    }

    let cleanup = if options.dry_run {
        Cleanup::Skipped
    } else {
        cleanup_quarantine(&layout.quarantine_dir)
    };

    Ok(RunSummary {
        dry_run: options.dry_run,
        quarantine_dir: layout.quarantine_dir.clone(),
        report,
        cleanup,
    })
}

fn dataset_root(layout: &Layout, dataset: Dataset) -> &Path {
    match dataset {
        Dataset::Filters => &layout.filters_dir,
        Dataset::QuantumEfficiency => &layout.qe_dir,
    }
}

fn progress_bar(len: usize, dataset: Dataset, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{msg}: {bar:40.cyan/blue} {pos}/{len}")
    {
        pb.set_style(style);
    }
    pb.set_message(dataset.label());
    pb
}

// ---------------------------------------------------------------------------
// Per-file processing
// ---------------------------------------------------------------------------

/// Convert one file in place, or move it under `quarantine_dir` at its path
/// relative to `root`.
pub fn process_file(
    dataset: Dataset,
    root: &Path,
    path: &Path,
    quarantine_dir: &Path,
    dry_run: bool,
) -> FileOutcome {
    let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();

    let converted = if dry_run {
        transpose_file(path, dataset).map(|table| table.len())
    } else {
        convert_in_place(path, dataset)
    };
    log_result(path, &converted);

    let outcome = match converted {
        Ok(rows) => Outcome::Converted { rows },
        Err(e) => {
            let reason = format!("{e:#}");
            let destination = quarantine_dir.join(&relative_path);
            if dry_run {
                Outcome::Quarantined { reason, destination }
            } else {
                match quarantine(path, &destination) {
                    Ok(()) => {
                        log::info!("Moved {} to {}", path.display(), destination.display());
                        Outcome::Quarantined { reason, destination }
                    }
                    Err(move_error) => {
                        log::error!(
                            "Could not quarantine {} to {}: {move_error}",
                            path.display(),
                            destination.display()
                        );
                        Outcome::QuarantineFailed {
                            reason,
                            move_error: move_error.to_string(),
                        }
                    }
                }
            }
        }
    };

    FileOutcome {
        dataset,
        relative_path,
        outcome,
    }
}

/// Move `path` to `destination`, creating parent directories.
fn quarantine(path: &Path, destination: &Path) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    move_file(path, destination)
}

/// Rename, falling back to copy + remove when the rename fails
/// (e.g. across filesystems).
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            log::debug!("rename {} failed ({rename_err}), copying", from.display());
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}

// ---------------------------------------------------------------------------
// Quarantine cleanup
// ---------------------------------------------------------------------------

/// Remove `dir` if it contains no files at any depth.
pub fn cleanup_quarantine(dir: &Path) -> Cleanup {
    if !dir.exists() {
        return Cleanup::Absent;
    }
    if contains_files(dir) {
        return Cleanup::Retained;
    }
    match fs::remove_dir_all(dir) {
        Ok(()) => {
            log::info!("Deleted empty folder: {}", dir.display());
            Cleanup::Deleted
        }
        Err(e) => {
            log::warn!("Could not delete {}: {e}", dir.display());
            Cleanup::Failed {
                error: e.to_string(),
            }
        }
    }
}

/// Whether anything other than a directory lives under `dir`. An unreadable
/// entry counts as a file so the tree is kept.
fn contains_files(dir: &Path) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .any(|entry| entry.map_or(true, |e| !e.file_type().is_dir()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn failed_file_moves_to_mirrored_path() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("filters_data");
        let quarantine_dir = dir.path().join("failed");
        let path = root.join("acme/blank.tsv");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "N\tName\tMfr\tHex\t400\t500\n\t\t\t\t\t\n").unwrap();

        let outcome = process_file(Dataset::Filters, &root, &path, &quarantine_dir, false);

        assert_eq!(outcome.relative_path, PathBuf::from("acme/blank.tsv"));
        assert!(matches!(outcome.outcome, Outcome::Quarantined { .. }));
        assert!(!path.exists());
        assert!(quarantine_dir.join("acme/blank.tsv").is_file());
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let quarantine_dir = dir.path().join("failed");
        let path = root.join("blank.tsv");
        let original = "Ch\tName\tMfr\t400\n";
        fs::write(&path, original).unwrap();

        let outcome = process_file(Dataset::QuantumEfficiency, &root, &path, &quarantine_dir, true);

        assert!(!outcome.is_success());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert!(!quarantine_dir.exists());
    }

    #[test]
    fn cleanup_removes_tree_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let quarantine_dir = dir.path().join("failed");
        fs::create_dir_all(quarantine_dir.join("a/b")).unwrap();

        assert_eq!(cleanup_quarantine(&quarantine_dir), Cleanup::Deleted);
        assert!(!quarantine_dir.exists());
        assert_eq!(cleanup_quarantine(&quarantine_dir), Cleanup::Absent);
    }

    #[test]
    fn cleanup_keeps_tree_with_nested_file() {
        let dir = tempfile::tempdir().unwrap();
        let quarantine_dir = dir.path().join("failed");
        fs::create_dir_all(quarantine_dir.join("a/b")).unwrap();
        fs::write(quarantine_dir.join("a/b/x.tsv"), "").unwrap();

        assert_eq!(cleanup_quarantine(&quarantine_dir), Cleanup::Retained);
        assert!(quarantine_dir.join("a/b/x.tsv").exists());
    }

    #[test]
    fn blocked_quarantine_destination_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("filters_data");
        let quarantine_dir = dir.path().join("failed");
        let path = root.join("blank.tsv");
        fs::create_dir_all(&root).unwrap();
        fs::write(&path, "N\tName\tMfr\tHex\t400\n\t\t\t\t\n").unwrap();
        fs::create_dir_all(quarantine_dir.join("blank.tsv")).unwrap();
        fs::write(quarantine_dir.join("blank.tsv/keep.txt"), "").unwrap();

        let outcome = process_file(Dataset::Filters, &root, &path, &quarantine_dir, false);

        match &outcome.outcome {
            Outcome::QuarantineFailed { reason, .. } => assert!(reason.contains("no data row")),
            other => panic!("expected a failed move, got {other:?}"),
        }
        assert!(!outcome.is_success());
        assert!(path.is_file());
    }

    #[cfg(unix)]
    #[test]
    fn cleanup_failure_is_reported_not_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("locked");
        let quarantine_dir = parent.join("failed");
        fs::create_dir_all(quarantine_dir.join("empty")).unwrap();
        fs::set_permissions(&parent, fs::Permissions::from_mode(0o555)).unwrap();

        let cleanup = cleanup_quarantine(&quarantine_dir);
        // Privileged users may remove it regardless.
        let still_there = quarantine_dir.exists();
        fs::set_permissions(&parent, fs::Permissions::from_mode(0o755)).unwrap();

        if still_there {
            assert!(matches!(cleanup, Cleanup::Failed { .. }));
        } else {
            assert_eq!(cleanup, Cleanup::Deleted);
        }
    }
}
