//! Error taxonomy for spectrum extraction

/// Errors that can occur while extracting, cleaning or formatting a spectrum
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The input does not satisfy the contract of the requested file kind
    #[error("Input error: {0}")]
    InputError(String),

    /// The file was read but its contents are unusable
    #[error("Data error: {0}")]
    DataError(String),

    /// Array rank or shape disagreement
    #[error("Shape error: {0}")]
    ShapeError(String),

    /// No conversion is known for the requested flux unit
    #[error("Unsupported flux unit: {0}")]
    UnsupportedUnitError(String),

    /// The requested output representation is not recognized
    #[error("Unknown output format: {0}")]
    UnknownFormatError(String),

    /// Failure in the underlying FITS reader
    #[error("FITS error: {0}")]
    FitsError(#[from] crate::fits::FitsError),

    /// I/O error while writing output
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arrow error while building the dataframe
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error while writing the dataframe
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// CSV error while writing the dataframe
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON error while writing the datacube
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, ExtractError>;
