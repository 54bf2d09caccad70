use rasterprep_image::Image;

/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `image` - The input raster.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel value.
///
/// Coordinates must be non-negative; neighbours past the last row or column
/// are clamped onto the border.
pub fn bilinear_interpolation(image: &Image<f32>, u: f32, v: f32) -> f32 {
    let (rows, cols) = (image.rows(), image.cols());

    let iu = u.trunc() as usize;
    let iv = v.trunc() as usize;

    let iu0 = iu.min(cols - 1);
    let iv0 = iv.min(rows - 1);

    let frac_u = u.fract();
    let frac_v = v.fract();

    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    let w00 = frac_uu * frac_vv;
    let w01 = frac_u * frac_vv;
    let w10 = frac_uu * frac_v;
    let w11 = frac_u * frac_v;

    let iu1 = if iu0 + 1 < cols { iu0 + 1 } else { iu0 };
    let iv1 = if iv0 + 1 < rows { iv0 + 1 } else { iv0 };

    let data = image.as_slice();

    let p00 = data[iv0 * cols + iu0];
    let p01 = data[iv0 * cols + iu1];
    let p10 = data[iv1 * cols + iu0];
    let p11 = data[iv1 * cols + iu1];

    p00 * w00 + p01 * w01 + p10 * w10 + p11 * w11
}
