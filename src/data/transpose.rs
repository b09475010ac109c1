use super::model::{
    TallTable, WideFilterRecord, WideQeRecord, FILTER_METADATA_MAP, FILTER_TALL_HEADER,
    QE_CHANNEL_MAP, QE_METADATA_MAP, QE_TALL_HEADER,
};
use crate::error::{Result, TableError};

// ---------------------------------------------------------------------------
// Wide → tall
// ---------------------------------------------------------------------------

/// One tall row per wavelength. Metadata fills the first row only.
pub fn filter_to_tall(record: &WideFilterRecord) -> TallTable {
    let width = FILTER_TALL_HEADER.len();
    let mut table = TallTable::with_header(&FILTER_TALL_HEADER, record.wavelengths.len());

    for (i, wavelength) in record.wavelengths.iter().enumerate() {
        let mut row = vec![String::new(); width];
        row[0] = wavelength.clone();
        row[1] = cell(&record.values, i);
        if i == 0 {
            for &(source, column) in &FILTER_METADATA_MAP {
                row[column] = record.metadata[source].clone();
            }
        }
        table.rows.push(row);
    }
    table
}

/// One tall row per wavelength with the B, G, R channels side by side.
///
/// Channels missing from the file leave their column empty. Name and
/// manufacturer come from the first channel row, so a file with wavelengths
/// but no channel rows is rejected.
pub fn qe_to_tall(record: &WideQeRecord) -> Result<TallTable> {
    let width = QE_TALL_HEADER.len();
    let mut table = TallTable::with_header(&QE_TALL_HEADER, record.wavelengths.len());

    for (i, wavelength) in record.wavelengths.iter().enumerate() {
        let mut row = vec![String::new(); width];
        row[0] = wavelength.clone();
        for (channel, &column) in record.channels.iter().zip(&QE_CHANNEL_MAP) {
            row[column] = cell(&channel.values, i);
        }
        if i == 0 {
            let first = record.channels.first().ok_or(TableError::NoChannelRows {
                wavelengths: record.wavelengths.len(),
            })?;
            for &(source, column) in &QE_METADATA_MAP {
                row[column] = first.metadata[source].clone();
            }
        }
        table.rows.push(row);
    }
    Ok(table)
}

fn cell(values: &[String], i: usize) -> String {
    values.get(i).cloned().unwrap_or_default()
}
