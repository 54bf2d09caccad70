use rasterprep_image::{Image, ImageError};

use crate::crop::{copy_window, AxisWindow};
use crate::moments::mass_centroid;

/// Shift the content of a raster by whole pixels.
///
/// Pixels shifted past the border are discarded and uncovered pixels are
/// filled with zero. When the shift moves everything out of the canvas the
/// result is all zero.
///
/// # Arguments
///
/// * `src` - The input raster.
/// * `dst` - The output raster, same size as `src`.
/// * `dx` - Columns to shift by, positive to the right.
/// * `dy` - Rows to shift by, positive downwards.
///
/// # Example
///
/// ```
/// use rasterprep_image::{Image, ImageSize};
/// use rasterprep_imgproc::translate::translate;
///
/// let src = Image::<f32>::new(ImageSize::from([3, 1]), vec![0.1, 0.2, 0.3]).unwrap();
/// let mut dst = Image::<f32>::zeros(src.size());
///
/// translate(&src, &mut dst, 1, 0).unwrap();
/// assert_eq!(dst.as_slice(), &[0.0, 0.1, 0.2]);
/// ```
pub fn translate<T>(src: &Image<T>, dst: &mut Image<T>, dx: i32, dy: i32) -> Result<(), ImageError>
where
    T: Copy + num_traits::Zero,
{
    dst.ensure_size(src.size())?;
    dst.as_slice_mut().fill(T::zero());

    let cols = AxisWindow::shifted(src.cols(), dx as i64);
    let rows = AxisWindow::shifted(src.rows(), dy as i64);

    copy_window(src, dst, cols, rows)
}

/// Shift a raster so that its center of mass lands on the grid center.
///
/// The shift is `round(center - centroid)` per axis, with the center at
/// `((N-1)/2, (N-1)/2)`. A raster with no mass is copied unchanged.
///
/// # Returns
///
/// The applied shift as `(dx, dy)`.
///
/// # Example
///
/// ```
/// use rasterprep_image::{Image, ImageSize};
/// use rasterprep_imgproc::translate::recenter_by_centroid;
///
/// let mut src = Image::<f32>::zeros(ImageSize::square(5));
/// *src.get_mut([0, 0]).unwrap() = 1.0;
/// let mut dst = Image::<f32>::zeros(src.size());
///
/// let shift = recenter_by_centroid(&src, &mut dst).unwrap();
/// assert_eq!(shift, (2, 2));
/// assert_eq!(dst.get([2, 2]), Some(&1.0));
/// ```
pub fn recenter_by_centroid(
    src: &Image<f32>,
    dst: &mut Image<f32>,
) -> Result<(i32, i32), ImageError> {
    dst.ensure_size(src.size())?;

    let Some(centroid) = mass_centroid(src) else {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok((0, 0));
    };

    let (cx, cy) = src.size().center();
    let dx = (cx - centroid.x).round() as i32;
    let dy = (cy - centroid.y).round() as i32;

    log::trace!(
        "centroid ({:.3}, {:.3}) mass {:.3}, shifting by ({dx}, {dy})",
        centroid.x,
        centroid.y,
        centroid.mass
    );

    translate(src, dst, dx, dy)?;

    Ok((dx, dy))
}
