#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// two-class mean difference analysis.
pub mod alignment;

/// image basic operations module.
pub mod core;

/// window copies and centered placement.
pub mod crop;

/// utilities for interpolation.
pub mod interpolation;

/// random pixel effects inside an area mask.
pub mod masking;

/// raster moments module.
pub mod moments;

/// module containing parallization utilities.
pub mod parallel;

/// band, circular, grid and manual area selection.
pub mod region;

/// utility functions for resizing images.
pub mod resize;

/// operations to threshold images.
pub mod threshold;

/// integer shifts and centroid recentering.
pub mod translate;

/// image geometric transformations module.
pub mod warp;
