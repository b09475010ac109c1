use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Dataset – which wide layout a file tree holds
// ---------------------------------------------------------------------------

/// The two wide layouts this tool understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Optical filter transmittance curves, one filter per file.
    Filters,
    /// Camera quantum-efficiency curves, up to three channels per file.
    QuantumEfficiency,
}

impl Dataset {
    /// Every dataset, in processing order.
    pub const ALL: [Dataset; 2] = [Dataset::Filters, Dataset::QuantumEfficiency];

    /// Label used for progress bars and the console report.
    pub fn label(self) -> &'static str {
        match self {
            Dataset::Filters => "Filters",
            Dataset::QuantumEfficiency => "Quantum Efficiency",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Column layout tables
// ---------------------------------------------------------------------------

/// Wide filter metadata: number, name, manufacturer, hex colour.
pub const FILTER_METADATA_COLUMNS: usize = 4;

/// Wide QE metadata: channel id, name, manufacturer.
pub const QE_METADATA_COLUMNS: usize = 3;

/// Header of a tall filter file.
pub const FILTER_TALL_HEADER: [&str; 6] = [
    "Wavelength",
    "Transmittance",
    "hex_color",
    "Manufacturer",
    "Name",
    "Filter Number",
];

/// `(wide metadata cell, tall column)` pairs filled on the first tall filter row.
///
/// The tall columns run in the reverse order of the wide metadata cells.
pub const FILTER_METADATA_MAP: [(usize, usize); 4] = [(3, 2), (2, 3), (1, 4), (0, 5)];

/// Header of a tall QE file.
pub const QE_TALL_HEADER: [&str; 6] = ["Wavelength", "B", "G", "R", "Manufacturer", "Name"];

/// Tall column for each channel row, in file order (Blue, Green, Red).
pub const QE_CHANNEL_MAP: [usize; 3] = [1, 2, 3];

/// `(wide metadata cell of channel 0, tall column)` pairs filled on the first tall QE row.
pub const QE_METADATA_MAP: [(usize, usize); 2] = [(2, 4), (1, 5)];

// ---------------------------------------------------------------------------
// Wide records
// ---------------------------------------------------------------------------

/// One wide filter file: a header plus its first non-blank data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideFilterRecord {
    /// Wavelength labels, in header order.
    pub wavelengths: Vec<String>,
    /// Metadata cells in source order, right-padded with empty strings.
    pub metadata: [String; FILTER_METADATA_COLUMNS],
    /// Transmittance cells, same length as `wavelengths`.
    pub values: Vec<String>,
}

/// One sensor channel row of a wide QE file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QeChannel {
    /// Channel id, name, manufacturer.
    pub metadata: [String; QE_METADATA_COLUMNS],
    /// Efficiency cells, same length as the owning record's wavelengths.
    pub values: Vec<String>,
}

/// One wide QE file: a header plus every row whose first cell is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideQeRecord {
    pub wavelengths: Vec<String>,
    /// Channel rows in file order. Only the first three are emitted.
    pub channels: Vec<QeChannel>,
}

// ---------------------------------------------------------------------------
// TallTable – the transposed output
// ---------------------------------------------------------------------------

/// A rectangular table ready to be written as TSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TallTable {
    /// Empty table with the given header.
    pub fn with_header(header: &[&str], capacity: usize) -> Self {
        TallTable {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Take the first `len` cells, right-padding with empty strings.
pub fn pad_cells<'a, I>(cells: I, len: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = cells.into_iter().take(len).map(str::to_string).collect();
    out.resize(len, String::new());
    out
}
