use thiserror::Error;

/// Reasons a wide table cannot be turned into a tall one.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("file has no header row")]
    MissingHeader,

    #[error("no data row found")]
    NoDataRow,

    #[error("no channel rows found for {wavelengths} wavelength columns")]
    NoChannelRows { wavelengths: usize },

    #[error("malformed TSV record: {0}")]
    Record(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, TableError>;
