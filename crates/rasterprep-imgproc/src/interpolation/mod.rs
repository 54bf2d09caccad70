//! Pixel interpolation for the rotation warp in `crate::warp`.
//!
//! Bilinear interpolation blends the four pixels around a sub-pixel
//! coordinate, clamping neighbours onto the border.

mod bilinear;

/// Grid generation and coordinate mapping utilities.
pub mod grid;

pub use bilinear::bilinear_interpolation;
