use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};

use super::model::{
    pad_cells, Dataset, QeChannel, WideFilterRecord, WideQeRecord, FILTER_METADATA_COLUMNS,
    QE_METADATA_COLUMNS,
};
use crate::error::{self, TableError};

/// A parsed wide file of either layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WideRecord {
    Filter(WideFilterRecord),
    QuantumEfficiency(WideQeRecord),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a wide file of the given dataset.
///
/// The whole file is read into memory first, so no handle on `path` stays
/// open once this returns.
pub fn load_file(path: &Path, dataset: Dataset) -> Result<WideRecord> {
    let bytes = std::fs::read(path).context("reading TSV file")?;
    let rows = parse_rows(&bytes)?;
    let record = match dataset {
        Dataset::Filters => WideRecord::Filter(parse_filter(&rows)?),
        Dataset::QuantumEfficiency => WideRecord::QuantumEfficiency(parse_qe(&rows)?),
    };
    Ok(record)
}

/// Split tab-delimited text into records. Rows may have any number of cells.
///
/// Physically empty lines are dropped by the reader, so leading empty lines
/// are skipped and the first non-empty line is the header. A line of tabs
/// only is kept as a record of empty cells.
pub fn parse_rows(bytes: &[u8]) -> error::Result<Vec<StringRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    reader
        .records()
        .map(|r| r.map_err(TableError::from))
        .collect()
}

// ---------------------------------------------------------------------------
// Filter layout
// ---------------------------------------------------------------------------

/// Header: number, name, manufacturer, hex colour, then wavelengths.
/// Only the first row with a non-blank cell is used; later rows are ignored.
pub fn parse_filter(rows: &[StringRecord]) -> error::Result<WideFilterRecord> {
    let (header, body) = rows.split_first().ok_or(TableError::MissingHeader)?;
    let wavelengths: Vec<String> = header
        .iter()
        .skip(FILTER_METADATA_COLUMNS)
        .map(str::to_string)
        .collect();

    let row = body
        .iter()
        .find(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .ok_or(TableError::NoDataRow)?;

    let metadata = metadata_cells::<FILTER_METADATA_COLUMNS>(row);
    let values = pad_cells(row.iter().skip(FILTER_METADATA_COLUMNS), wavelengths.len());

    Ok(WideFilterRecord {
        wavelengths,
        metadata,
        values,
    })
}

// ---------------------------------------------------------------------------
// Quantum-efficiency layout
// ---------------------------------------------------------------------------

/// Header: channel id, name, manufacturer, then wavelengths.
/// Every row with a non-empty first cell is a channel; other rows are skipped.
pub fn parse_qe(rows: &[StringRecord]) -> error::Result<WideQeRecord> {
    let (header, body) = rows.split_first().ok_or(TableError::MissingHeader)?;
    let wavelengths: Vec<String> = header
        .iter()
        .skip(QE_METADATA_COLUMNS)
        .map(str::to_string)
        .collect();

    let channels = body
        .iter()
        .filter(|row| row.get(0).is_some_and(|first| !first.is_empty()))
        .map(|row| QeChannel {
            metadata: metadata_cells::<QE_METADATA_COLUMNS>(row),
            values: pad_cells(row.iter().skip(QE_METADATA_COLUMNS), wavelengths.len()),
        })
        .collect();

    Ok(WideQeRecord {
        wavelengths,
        channels,
    })
}

/// First `N` cells of a row, right-padded with empty strings.
fn metadata_cells<const N: usize>(row: &StringRecord) -> [String; N] {
    std::array::from_fn(|i| row.get(i).unwrap_or_default().to_string())
}
