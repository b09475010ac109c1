use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const FILTERS_DIR: &str = "filters_data";
pub const QE_DIR: &str = "QE_data";
pub const QUARANTINE_DIR: &str = "failed conversions";
pub const EXTENSION: &str = "tsv";

// ---------------------------------------------------------------------------
// Layout – where the data trees live
// ---------------------------------------------------------------------------

/// Directories a run reads from and quarantines into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub filters_dir: PathBuf,
    pub qe_dir: PathBuf,
    pub quarantine_dir: PathBuf,
    /// File extension to convert, without the dot.
    pub extension: String,
}

impl Layout {
    /// Default directory names under `base`.
    pub fn under(base: &Path) -> Self {
        Layout {
            filters_dir: base.join(FILTERS_DIR),
            qe_dir: base.join(QE_DIR),
            quarantine_dir: base.join(QUARANTINE_DIR),
            extension: EXTENSION.to_string(),
        }
    }

    /// Default layout beside the running executable.
    pub fn beside_executable() -> Result<Self> {
        let exe = std::env::current_exe().context("locating executable")?;
        let base = exe
            .parent()
            .with_context(|| format!("executable {} has no parent directory", exe.display()))?;
        Ok(Layout::under(base))
    }

    /// Apply overrides. Relative override paths are joined onto `relative_to`
    /// when given.
    pub fn apply(mut self, overrides: LayoutOverrides, relative_to: Option<&Path>) -> Self {
        let resolve = |p: PathBuf| match relative_to {
            Some(base) if p.is_relative() => base.join(p),
            _ => p,
        };
        if let Some(p) = overrides.filters_dir {
            self.filters_dir = resolve(p);
        }
        if let Some(p) = overrides.qe_dir {
            self.qe_dir = resolve(p);
        }
        if let Some(p) = overrides.quarantine_dir {
            self.quarantine_dir = resolve(p);
        }
        if let Some(ext) = overrides.extension {
            self.extension = ext.trim_start_matches('.').to_string();
        }
        self
    }
}

// ---------------------------------------------------------------------------
// LayoutOverrides – config file / CLI
// ---------------------------------------------------------------------------

/// Partial layout, as read from a JSON config file or the command line.
///
/// ```json
/// { "filters_dir": "filters", "quarantine_dir": "/tmp/failed", "extension": "txt" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutOverrides {
    pub filters_dir: Option<PathBuf>,
    pub qe_dir: Option<PathBuf>,
    pub quarantine_dir: Option<PathBuf>,
    pub extension: Option<String>,
}

impl LayoutOverrides {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
