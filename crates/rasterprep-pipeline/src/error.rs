use rasterprep_image::ImageError;
use rasterprep_imgproc::{alignment::AlignmentError, region::RegionError};

use crate::dataset::LabelMismatch;

/// An error type for configuration loading and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A numeric option is outside its accepted range.
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// Dotted path of the option.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },

    /// The raster size is empty or not square.
    #[error("Invalid raster size. {0}")]
    Image(#[from] ImageError),

    /// The grid or manual region cannot be built.
    #[error("Invalid region. {0}")]
    Region(#[from] RegionError),

    /// The configuration file could not be parsed.
    #[error("Failed to parse the configuration. {0}")]
    Json(#[from] serde_json::Error),
}

/// An error type for dataset operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DatasetError {
    /// An image index past the end of the dataset.
    #[error("Index {index} is out of bounds for a dataset of {len} images")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// Number of images.
        len: usize,
    },

    /// An inclusive range that is reversed or runs past the end.
    #[error("Range [{start}, {end}] is invalid for a dataset of {len} images")]
    InvalidRange {
        /// First index.
        start: usize,
        /// Last index, inclusive.
        end: usize,
        /// Number of images.
        len: usize,
    },

    /// The operation needs one label per image.
    #[error("Labels do not line up with images. {0}")]
    LabelMismatch(LabelMismatch),

    /// Images of different sizes, or another image level failure.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// An error type for pipeline execution.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// One image of a batch failed; nothing was committed.
    #[error("Batch failed at image {index}. {source}")]
    Batch {
        /// Index of the failing image.
        index: usize,
        /// Why it failed.
        #[source]
        source: ImageError,
    },

    /// The configuration is invalid for the pipeline size.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The dataset rejected the operation.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// The difference analysis failed.
    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    /// Image level failure.
    #[error(transparent)]
    Image(#[from] ImageError),
}
