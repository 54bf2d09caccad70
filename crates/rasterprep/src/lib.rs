//! Augmentation and class-difference analysis for small square raster datasets.
//!
//! The crates are re-exported under short names:
//!
//! - [`image`]: rasters, area masks and labels
//! - [`imgproc`]: geometry, regions, masking and the difference analysis
//! - [`io`]: CSV rows in and out
//! - [`pipeline`]: configuration, datasets and the stage runner

#[doc(inline)]
pub use rasterprep_image as image;

#[doc(inline)]
pub use rasterprep_imgproc as imgproc;

#[doc(inline)]
pub use rasterprep_io as io;

#[doc(inline)]
pub use rasterprep_pipeline as pipeline;
