use std::path::Path;

use anyhow::{Context, Result};

use crate::data::loader::{load_file, WideRecord};
use crate::data::model::{Dataset, TallTable};
use crate::data::{transpose, writer};

// ---------------------------------------------------------------------------
// Single-file conversion
// ---------------------------------------------------------------------------

/// Read a wide file and build its tall equivalent without writing anything.
pub fn transpose_file(path: &Path, dataset: Dataset) -> Result<TallTable> {
    let table = match load_file(path, dataset)? {
        WideRecord::Filter(record) => transpose::filter_to_tall(&record),
        WideRecord::QuantumEfficiency(record) => transpose::qe_to_tall(&record)?,
    };
    Ok(table)
}

/// Convert `path` in place. Returns the number of wavelength rows written.
///
/// The new content is fully built before the file is replaced, so on error
/// the original is untouched.
pub fn convert_in_place(path: &Path, dataset: Dataset) -> Result<usize> {
    let table = transpose_file(path, dataset)?;
    let bytes = writer::to_tsv(&table)?;
    writer::replace_file(path, &bytes).context("writing tall file")?;
    Ok(table.len())
}

/// Convert a wide filter file in place, logging any failure.
///
/// Library entry point for single files; batch runs go through
/// [`convert_in_place`] to keep the failure reason.
pub fn convert_filter_file(path: &Path) -> bool {
    let result = convert_in_place(path, Dataset::Filters);
    log_result(path, &result);
    result.is_ok()
}

/// Convert a wide quantum-efficiency file in place, logging any failure.
pub fn convert_qe_file(path: &Path) -> bool {
    let result = convert_in_place(path, Dataset::QuantumEfficiency);
    log_result(path, &result);
    result.is_ok()
}

/// Log a conversion result: row count on success, the error chain on failure.
pub(crate) fn log_result(path: &Path, result: &Result<usize>) {
    match result {
        Ok(rows) => log::debug!("Converted {} ({rows} rows)", path.display()),
        Err(e) => log::warn!("Failed to convert {}: {e:#}", path.display()),
    }
}
