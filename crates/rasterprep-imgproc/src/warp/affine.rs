use std::f32::consts::PI;

use rasterprep_image::{Image, ImageError};

use crate::interpolation::{bilinear_interpolation, grid::meshgrid_from_fn};
use crate::parallel;

/// Inverts a 2x3 affine transformation matrix.
///
/// Arguments:
///
/// * `m` - The 2x3 affine transformation matrix.
///
/// Returns:
///
/// The inverted 2x3 affine transformation matrix.
pub fn invert_affine_transform(m: &[f32; 6]) -> [f32; 6] {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    // a singular matrix maps everything onto the origin
    let determinant = a * e - b * d;
    let inv_determinant = if determinant != 0.0 {
        1.0 / determinant
    } else {
        0.0
    };

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    [new_a, new_b, new_c, new_d, new_e, new_f]
}

/// Returns a 2x3 rotation matrix for a 2D rotation around a center point.
///
/// The rotation matrix is defined as:
///
/// | alpha  beta  tx |
/// | -beta  alpha ty |
///
/// where:
///
/// alpha = scale * cos(angle)
/// beta = scale * sin(angle)
/// tx = (1 - alpha) * center.x - beta * center.y
/// ty = beta * center.x + (1 - alpha) * center.y
///
/// # Arguments
///
/// * `center` - The center point of the rotation as `(x, y)`.
/// * `angle` - The angle of rotation in degrees, counter-clockwise as displayed.
/// * `scale` - The scale factor.
pub fn get_rotation_matrix2d(center: (f32, f32), angle: f32, scale: f32) -> [f32; 6] {
    let angle = angle * PI / 180.0f32;
    let alpha = scale * angle.cos();
    let beta = scale * angle.sin();

    let tx = (1.0 - alpha) * center.0 - beta * center.1;
    let ty = beta * center.0 + (1.0 - alpha) * center.1;

    [alpha, beta, tx, -beta, alpha, ty]
}

/// Applies an affine transformation to a point.
fn transform_point(x: f32, y: f32, m: &[f32; 6]) -> (f32, f32) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Applies an affine transformation to a raster with bilinear resampling.
///
/// Destination pixels whose preimage falls outside the source keep their
/// current value, so callers wanting a zero background pass a zeroed `dst`.
///
/// # Arguments
///
/// * `src` - The input raster.
/// * `dst` - The output raster.
/// * `m` - The 2x3 affine transformation matrix.
pub fn warp_affine(
    src: &Image<f32>,
    dst: &mut Image<f32>,
    m: &[f32; 6],
) -> Result<(), ImageError> {
    if src.size().num_pixels() == 0 || dst.size().num_pixels() == 0 {
        return Err(ImageError::EmptyImage);
    }

    // invert affine transform matrix to find corresponding positions in src from dst
    let m_inv = invert_affine_transform(m);

    let (dst_rows, dst_cols) = (dst.rows(), dst.cols());
    let (map_x, map_y) = meshgrid_from_fn(dst_cols, dst_rows, |x, y| {
        Ok(transform_point(x as f32, y as f32, &m_inv))
    })?;

    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |&x, &y, dst_pixel| {
        if x >= 0.0f32 && x < src.cols() as f32 && y >= 0.0f32 && y < src.rows() as f32 {
            *dst_pixel = bilinear_interpolation(src, x, y);
        }
    });

    Ok(())
}

/// Whether this build can rotate rasters.
pub const fn is_rotation_available() -> bool {
    cfg!(feature = "rotation")
}

/// Rotate a raster about its continuous center.
///
/// The canvas keeps its size: corners rotated out of the grid are lost and
/// uncovered pixels are zero. Values are resampled bilinearly and clipped to
/// `[0, 1]`.
///
/// # Arguments
///
/// * `src` - The input raster.
/// * `dst` - The output raster, same size as `src`.
/// * `angle` - Rotation angle in degrees, counter-clockwise as displayed.
///
/// # Errors
///
/// [`ImageError::InvalidImageSize`] when the sizes differ. When the crate is
/// built without the `rotation` feature, `dst` receives an exact copy of
/// `src` and [`ImageError::CapabilityUnavailable`] is returned so callers can
/// treat the stage as identity.
///
/// # Example
///
/// ```
/// use rasterprep_image::{Image, ImageSize};
/// use rasterprep_imgproc::warp::rotate;
///
/// let src = Image::<f32>::from_size_val(ImageSize::square(5), 1.0).unwrap();
/// let mut dst = Image::<f32>::zeros(src.size());
///
/// rotate(&src, &mut dst, 0.0).unwrap();
/// assert_eq!(dst.as_slice(), src.as_slice());
/// ```
pub fn rotate(src: &Image<f32>, dst: &mut Image<f32>, angle: f32) -> Result<(), ImageError> {
    dst.ensure_size(src.size())?;

    if !is_rotation_available() {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Err(ImageError::CapabilityUnavailable("rotation"));
    }

    if angle == 0.0 {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    dst.as_slice_mut().fill(0.0);
    let m = get_rotation_matrix2d(src.size().center(), angle, 1.0);
    warp_affine(src, dst, &m)?;
    dst.clip_unit();

    Ok(())
}
