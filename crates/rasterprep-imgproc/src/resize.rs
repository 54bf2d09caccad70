use rasterprep_image::{Image, ImageError, ImageSize};

use crate::crop::fit_centered;

/// Resize a raster to the size of `dst` with nearest-neighbor index mapping.
///
/// Destination index `i` samples source index `floor(i * src_len / dst_len)`
/// on each axis, so no value is ever interpolated.
///
/// # Arguments
///
/// * `src` - The input raster.
/// * `dst` - The output raster, any size.
///
/// # Example
///
/// ```
/// use rasterprep_image::{Image, ImageSize};
/// use rasterprep_imgproc::resize::resize_nearest;
///
/// let src = Image::<f32>::new(ImageSize::from([2, 1]), vec![0.25, 0.75]).unwrap();
/// let mut dst = Image::<f32>::zeros(ImageSize::from([4, 1]));
///
/// resize_nearest(&src, &mut dst).unwrap();
/// assert_eq!(dst.as_slice(), &[0.25, 0.25, 0.75, 0.75]);
/// ```
pub fn resize_nearest<T: Copy>(src: &Image<T>, dst: &mut Image<T>) -> Result<(), ImageError> {
    if src.size().num_pixels() == 0 {
        return Err(ImageError::EmptyImage);
    }

    let (src_cols, src_rows) = (src.cols(), src.rows());
    let (dst_cols, dst_rows) = (dst.cols(), dst.rows());

    let col_index: Vec<usize> = (0..dst_cols).map(|c| c * src_cols / dst_cols).collect();

    let src_data = src.as_slice();
    for (r, dst_row) in dst.as_slice_mut().chunks_exact_mut(dst_cols.max(1)).enumerate() {
        let src_row = r * src_rows / dst_rows;
        let src_offset = src_row * src_cols;
        dst_row
            .iter_mut()
            .zip(col_index.iter())
            .for_each(|(pixel, &c)| *pixel = src_data[src_offset + c]);
    }

    Ok(())
}

/// Largest zoom factor accepted by [`rescale`].
pub const MAX_RESCALE_FACTOR: f32 = 8.0;

/// Zoom a raster in or out while keeping its canvas size.
///
/// The raster is first resampled to `round(scale * N)` pixels per axis with
/// [`resize_nearest`], then placed back onto the original canvas centered on
/// the midpoint of the resampled grid: enlarged rasters are center-cropped,
/// shrunk rasters are zero-padded. A scale of exactly `1.0` copies the input.
///
/// # Arguments
///
/// * `src` - The input raster.
/// * `dst` - The output raster, same size as `src`.
/// * `scale` - Zoom factor in `(0, MAX_RESCALE_FACTOR]`.
///
/// # Errors
///
/// [`ImageError::InvalidImageSize`] when `dst` differs in size from `src` and
/// [`ImageError::InvalidScale`] for a factor that is not finite or is outside
/// `(0, MAX_RESCALE_FACTOR]`.
///
/// # Example
///
/// ```
/// use rasterprep_image::{Image, ImageSize};
/// use rasterprep_imgproc::resize::rescale;
///
/// let src = Image::<f32>::from_size_val(ImageSize::square(20), 1.0).unwrap();
/// let mut dst = Image::<f32>::zeros(src.size());
///
/// rescale(&src, &mut dst, 0.5).unwrap();
/// assert_eq!(dst.total_mass(), 100.0);
/// ```
pub fn rescale(src: &Image<f32>, dst: &mut Image<f32>, scale: f32) -> Result<(), ImageError> {
    dst.ensure_size(src.size())?;

    if !(scale > 0.0 && scale <= MAX_RESCALE_FACTOR) {
        return Err(ImageError::InvalidScale(scale, MAX_RESCALE_FACTOR));
    }

    if scale == 1.0 {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    let scaled_len = |len: usize| -> usize {
        (scale * len as f32).round() as usize
    };

    let scaled_size = ImageSize {
        width: scaled_len(src.cols()),
        height: scaled_len(src.rows()),
    };

    if scaled_size.num_pixels() == 0 {
        dst.as_slice_mut().fill(0.0);
        return Ok(());
    }

    let mut scaled = Image::<f32>::zeros(scaled_size);
    resize_nearest(src, &mut scaled)?;

    fit_centered(&scaled, dst)
}
