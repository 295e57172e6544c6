/// Errors that can occur while reading or writing FITS files
#[derive(Debug, thiserror::Error)]
pub enum FitsError {
    /// Error reported by cfitsio through the `fitsio` crate
    #[error("FITS I/O error: {0}")]
    FitsIo(#[from] fitsio::errors::Error),

    /// Column not found in a table extension
    #[error("Column {column} not found in extension {extension}")]
    ColumnNotFound {
        /// Requested column name
        column: String,
        /// Index of the extension searched
        extension: usize,
    },

    /// Extension index past the end of the file
    #[error("Extension {index} out of range (file has {count} HDUs)")]
    ExtensionOutOfRange {
        /// Requested index
        index: usize,
        /// Number of HDUs in the file
        count: usize,
    },

    /// Extension exists but does not hold a table
    #[error("Extension {0} is not a table")]
    NotATable(usize),

    /// Column data passed to the writer disagrees in length
    #[error("Column length mismatch: {column} has {actual} rows, expected {expected}")]
    LengthMismatch {
        /// Offending column
        column: String,
        /// Row count of the first column
        expected: usize,
        /// Row count of the offending column
        actual: usize,
    },
}
