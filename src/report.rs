use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Per-file outcome
// ---------------------------------------------------------------------------

/// What happened to one discovered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Rewritten in tall layout (or would be, on a dry run).
    Converted { rows: usize },
    /// Moved to quarantine (or would be, on a dry run).
    Quarantined { reason: String, destination: PathBuf },
    /// Conversion failed and the file could not be moved either.
    QuarantineFailed { reason: String, move_error: String },
}

/// A file's outcome together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub dataset: Dataset,
    /// Path relative to the dataset root.
    pub relative_path: PathBuf,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Converted { .. })
    }
}

// ---------------------------------------------------------------------------
// BatchReport – fold of every outcome in a run
// ---------------------------------------------------------------------------

/// All file outcomes of a run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    /// Number of files processed.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Relative paths of failed files, in processing order.
    pub fn failed_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| &o.relative_path)
    }
}

impl FromIterator<FileOutcome> for BatchReport {
    fn from_iter<I: IntoIterator<Item = FileOutcome>>(iter: I) -> Self {
        BatchReport {
            outcomes: iter.into_iter().collect(),
        }
    }
}

impl Extend<FileOutcome> for BatchReport {
    fn extend<I: IntoIterator<Item = FileOutcome>>(&mut self, iter: I) {
        self.outcomes.extend(iter);
    }
}

// ---------------------------------------------------------------------------
// Quarantine cleanup
// ---------------------------------------------------------------------------

/// What happened to the quarantine directory at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Cleanup {
    /// The directory was never created.
    Absent,
    /// It holds quarantined files and was left in place.
    Retained,
    /// It held no files and was removed.
    Deleted,
    /// It held no files but could not be removed.
    Failed { error: String },
    /// Dry run: nothing removed.
    Skipped,
}

// ---------------------------------------------------------------------------
// RunSummary – what the console report prints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub dry_run: bool,
    pub quarantine_dir: PathBuf,
    pub report: BatchReport,
    pub cleanup: Cleanup,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = &self.report;
        if self.dry_run {
            writeln!(f, "Dry run: no files were modified")?;
        }
        writeln!(
            f,
            "Successfully converted {}/{} files",
            report.succeeded(),
            report.total()
        )?;
        writeln!(f, "{} failed conversions", report.failed())?;

        if report.failed() > 0 {
            writeln!(f, "Failed files:")?;
            for outcome in report.outcomes().iter().filter(|o| !o.is_success()) {
                write!(f, "   {}", outcome.relative_path.display())?;
                if let Outcome::QuarantineFailed { move_error, .. } = &outcome.outcome {
                    write!(f, " (not moved: {move_error})")?;
                }
                writeln!(f)?;
            }
        }

        let dir = self.quarantine_dir.display();
        match &self.cleanup {
            Cleanup::Deleted => writeln!(f, "Deleted empty folder: {dir}")?,
            Cleanup::Failed { error } => writeln!(f, "Could not delete {dir}: {error}")?,
            Cleanup::Retained => writeln!(f, "Failed files kept in: {dir}")?,
            Cleanup::Absent | Cleanup::Skipped => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converted(path: &str) -> FileOutcome {
        FileOutcome {
            dataset: Dataset::Filters,
            relative_path: PathBuf::from(path),
            outcome: Outcome::Converted { rows: 2 },
        }
    }

    fn quarantined(path: &str) -> FileOutcome {
        FileOutcome {
            dataset: Dataset::QuantumEfficiency,
            relative_path: PathBuf::from(path),
            outcome: Outcome::Quarantined {
                reason: "no data row found".into(),
                destination: PathBuf::from("failed").join(path),
            },
        }
    }

    #[test]
    fn totals_fold_over_outcomes() {
        let mut report: BatchReport = vec![converted("a.tsv"), quarantined("b.tsv")]
            .into_iter()
            .collect();
        report.extend([converted("c.tsv")]);

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failed_paths().collect::<Vec<_>>(), vec![&PathBuf::from("b.tsv")]);
    }

    #[test]
    fn summary_lists_failures_and_cleanup() {
        let summary = RunSummary {
            dry_run: false,
            quarantine_dir: PathBuf::from("failed conversions"),
            report: vec![converted("a.tsv"), quarantined("sub/b.tsv")]
                .into_iter()
                .collect(),
            cleanup: Cleanup::Retained,
        };
        let text = summary.to_string();

        assert!(text.contains("Successfully converted 1/2 files"));
        assert!(text.contains("1 failed conversions"));
        assert!(text.contains("Failed files:\n   sub/b.tsv\n"));
        assert!(text.contains("Failed files kept in: failed conversions"));
    }

    #[test]
    fn summary_serializes_outcome_status() {
        let json = serde_json::to_value(quarantined("b.tsv")).unwrap();
        assert_eq!(json["status"], "quarantined");
        assert_eq!(json["dataset"], "quantum_efficiency");
        assert_eq!(json["relative_path"], "b.tsv");
    }

    #[test]
    fn summary_reports_failed_move_and_cleanup_error() {
        let summary = RunSummary {
            dry_run: false,
            quarantine_dir: PathBuf::from("failed conversions"),
            report: vec![FileOutcome {
                dataset: Dataset::Filters,
                relative_path: PathBuf::from("b.tsv"),
                outcome: Outcome::QuarantineFailed {
                    reason: "no data row found".into(),
                    move_error: "Is a directory".into(),
                },
            }]
            .into_iter()
            .collect(),
            cleanup: Cleanup::Failed {
                error: "Permission denied".into(),
            },
        };
        let text = summary.to_string();

        assert!(text.contains("1 failed conversions"));
        assert!(text.contains("   b.tsv (not moved: Is a directory)\n"));
        assert!(text.contains("Could not delete failed conversions: Permission denied"));
    }
}
