use rasterprep_image::{AreaMask, Image, ImageError};

use crate::parallel;

/// Mark every pixel whose value reaches a threshold.
///
/// The comparison is inclusive: a pixel equal to `threshold` is marked.
///
/// # Arguments
///
/// * `src` - The input raster.
/// * `dst` - The output selection, same size as `src`.
/// * `threshold` - The cutoff value.
pub fn threshold_binary<T>(
    src: &Image<T>,
    dst: &mut Image<bool>,
    threshold: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = *src_pixel >= threshold;
    });

    Ok(())
}

/// Build an [`AreaMask`] of the pixels whose value is at least `threshold`.
///
/// # Example
///
/// ```
/// use rasterprep_image::{Image, ImageSize};
/// use rasterprep_imgproc::threshold::threshold_mask;
///
/// let image = Image::<f32>::new(ImageSize::from([3, 1]), vec![0.1, 0.5, 0.9]).unwrap();
/// let mask = threshold_mask(&image, 0.5).unwrap();
///
/// assert_eq!(mask.as_slice(), &[false, true, true]);
/// ```
pub fn threshold_mask(src: &Image<f32>, threshold: f32) -> Result<AreaMask, ImageError> {
    let mut selected = Image::from_fn(src.size(), |_, _| false);
    threshold_binary(src, &mut selected, threshold)?;
    AreaMask::new(src.size(), selected.into_vec())
}
