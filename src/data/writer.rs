use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use tempfile::NamedTempFile;

use super::model::TallTable;

/// Row terminator for the host platform.
fn terminator() -> Terminator {
    if cfg!(windows) {
        Terminator::CRLF
    } else {
        Terminator::Any(b'\n')
    }
}

/// Serialize a table as tab-separated text, header first.
pub fn to_tsv(table: &TallTable) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Necessary)
        .terminator(terminator())
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(&table.header).context("writing header row")?;
    for (i, row) in table.rows.iter().enumerate() {
        writer
            .write_record(row)
            .with_context(|| format!("writing row {i}"))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing TSV buffer: {}", e.error()))
}

/// Replace `path` with `contents` via a temporary file in the same directory.
///
/// The target is only touched by the final rename, so a failure at any point
/// leaves the original file intact. A symlink is written through: its target
/// is replaced and the link stays. The original permissions are kept.
pub fn replace_file(path: &Path, contents: &[u8]) -> Result<()> {
    let target = if fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink()) {
        fs::canonicalize(path).with_context(|| format!("resolving link '{}'", path.display()))?
    } else {
        path.to_path_buf()
    };
    let permissions = fs::metadata(&target).ok().map(|m| m.permissions());

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating staging file in '{}'", dir.display()))?;
    staged.write_all(contents).context("writing staging file")?;
    staged.flush().context("flushing staging file")?;
    if let Some(permissions) = permissions {
        staged
            .as_file()
            .set_permissions(permissions)
            .context("copying permissions to staging file")?;
    }
    staged
        .as_file()
        .sync_all()
        .context("syncing staging file")?;
    staged
        .persist(&target)
        .map_err(|e| e.error)
        .with_context(|| format!("replacing '{}'", target.display()))?;
    Ok(())
}
