//! Geometric image transformations using affine warps.
//!
//! - Affine transformations (rotation, translation, scaling)
//! - Rotation matrix generation
//! - Affine transform inversion
//! - Rotation of a raster about its center, clipped to the unit range
//!
//! # Examples
//!
//! Rotating a 20x20 raster by 15 degrees:
//!
//! ```
//! use rasterprep_image::{Image, ImageSize};
//! use rasterprep_imgproc::warp::rotate;
//!
//! let src = Image::<f32>::zeros(ImageSize::square(20));
//! let mut dst = Image::<f32>::zeros(src.size());
//! rotate(&src, &mut dst, 15.0).unwrap();
//! ```

mod affine;

pub use affine::{
    get_rotation_matrix2d, invert_affine_transform, is_rotation_available, rotate, warp_affine,
};
