#![deny(missing_docs)]
//! Square raster and area mask types for fixed-size image datasets

/// image representation for raster processing purposes.
pub mod image;

/// boolean selection grids matching an image.
pub mod mask;

/// Error types for the image module.
pub mod error;

/// class labels attached to rasters.
pub mod label;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize, RasterImage};
pub use crate::label::Label;
pub use crate::mask::AreaMask;
