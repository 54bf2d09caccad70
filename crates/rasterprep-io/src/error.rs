/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open or write the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error reported by the CSV reader or writer.
    #[error("Failed to process the csv data. {0}")]
    CsvError(#[from] csv::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] rasterprep_image::ImageError),
}

/// Why a single CSV row was left out of a load.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RowRejection {
    /// The row does not hold one value per pixel.
    #[error("expected {expected} values, found {found}")]
    WrongLength {
        /// Pixels per raster.
        expected: usize,
        /// Fields in the row.
        found: usize,
    },

    /// A field is not a number.
    #[error("column {column}: '{token}' is not a number")]
    NotNumeric {
        /// Zero-based column.
        column: usize,
        /// The offending text.
        token: String,
    },

    /// A value is outside `[0, 1]` or not finite.
    #[error("column {column}: value {value} is outside [0, 1]")]
    OutOfRange {
        /// Zero-based column.
        column: usize,
        /// The offending value.
        value: f32,
    },

    /// The CSV reader could not decode the row.
    #[error("malformed row: {0}")]
    Malformed(String),
}
