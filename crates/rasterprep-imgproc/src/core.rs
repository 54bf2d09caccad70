use rasterprep_image::{AreaMask, Image, ImageError};

use crate::parallel;

/// Compute the pixel-wise mean of a set of rasters.
///
/// Values are accumulated in `f64` to keep large sets stable.
///
/// # Arguments
///
/// * `images` - The rasters to average, all of the same size.
///
/// # Errors
///
/// [`ImageError::EmptyImage`] when `images` is empty or the rasters have no
/// pixel, and [`ImageError::InvalidImageSize`] when the sizes disagree.
///
/// # Example
///
/// ```
/// use rasterprep_image::{Image, ImageSize};
/// use rasterprep_imgproc::core::mean_image;
///
/// let size = ImageSize::square(2);
/// let a = Image::<f32>::from_size_val(size, 0.0).unwrap();
/// let b = Image::<f32>::from_size_val(size, 1.0).unwrap();
///
/// let mean = mean_image(&[a, b]).unwrap();
/// assert_eq!(mean.as_slice(), &[0.5; 4]);
/// ```
pub fn mean_image(images: &[Image<f32>]) -> Result<Image<f32>, ImageError> {
    let first = images.first().ok_or(ImageError::EmptyImage)?;
    let size = first.size();
    if size.num_pixels() == 0 {
        return Err(ImageError::EmptyImage);
    }

    let mut sum = vec![0f64; size.num_pixels()];
    for image in images {
        image.ensure_size(size)?;
        sum.iter_mut()
            .zip(image.as_slice())
            .for_each(|(acc, &v)| *acc += v as f64);
    }

    let n = images.len() as f64;
    Image::new(size, sum.into_iter().map(|s| (s / n) as f32).collect())
}

/// Compute the absolute difference of two rasters pixel by pixel.
///
/// # Arguments
///
/// * `src1` - The first input raster.
/// * `src2` - The second input raster.
/// * `dst` - The output raster.
///
/// All three must have the same size.
pub fn abs_diff(
    src1: &Image<f32>,
    src2: &Image<f32>,
    dst: &mut Image<f32>,
) -> Result<(), ImageError> {
    src2.ensure_size(src1.size())?;
    dst.ensure_size(src1.size())?;

    parallel::par_iter_rows_val_two(src1, src2, dst, |&a, &b, d| {
        *d = (a - b).abs();
    });

    Ok(())
}

/// Keep the pixels selected by a mask and zero the rest.
///
/// This is a multiplication by the mask taken as `1.0` / `0.0` weights.
///
/// # Arguments
///
/// * `src` - The input raster.
/// * `mask` - The pixels to keep.
/// * `dst` - The output raster.
///
/// # Example
///
/// ```
/// use rasterprep_image::{AreaMask, Image, ImageSize};
/// use rasterprep_imgproc::core::mask_filter;
///
/// let size = ImageSize::square(2);
/// let src = Image::<f32>::new(size, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
/// let mask = AreaMask::new(size, vec![true, false, false, true]).unwrap();
/// let mut dst = Image::<f32>::zeros(size);
///
/// mask_filter(&src, &mask, &mut dst).unwrap();
/// assert_eq!(dst.as_slice(), &[0.1, 0.0, 0.0, 0.4]);
/// ```
pub fn mask_filter(
    src: &Image<f32>,
    mask: &AreaMask,
    dst: &mut Image<f32>,
) -> Result<(), ImageError> {
    mask.ensure_size(src.size())?;
    dst.ensure_size(src.size())?;

    parallel::par_iter_rows_val_two(src, mask, dst, |&v, &keep, d| {
        *d = if keep { v } else { 0.0 };
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rasterprep_image::{AreaMask, Image, ImageError, ImageSize};

    #[test]
    fn mean_of_three() -> Result<(), ImageError> {
        let size = ImageSize::from([3, 1]);
        let images = vec![
            Image::new(size, vec![0.0f32, 0.3, 1.0])?,
            Image::new(size, vec![0.3f32, 0.3, 1.0])?,
            Image::new(size, vec![0.6f32, 0.3, 0.1])?,
        ];

        let mean = super::mean_image(&images)?;
        let expected = [0.3f32, 0.3, 0.7];
        for (m, e) in mean.as_slice().iter().zip(expected) {
            assert_relative_eq!(*m, e, epsilon = 1e-6);
        }

        Ok(())
    }

    #[test]
    fn mean_of_nothing() {
        assert_eq!(super::mean_image(&[]), Err(ImageError::EmptyImage));
    }

    #[test]
    fn mean_of_pixelless_rasters() {
        let images = vec![Image::<f32>::zeros(ImageSize::from([0, 3])); 2];
        assert_eq!(super::mean_image(&images), Err(ImageError::EmptyImage));
    }

    #[test]
    fn mean_size_mismatch() -> Result<(), ImageError> {
        let images = vec![
            Image::<f32>::zeros(ImageSize::square(2)),
            Image::<f32>::zeros(ImageSize::square(3)),
        ];
        assert_eq!(
            super::mean_image(&images),
            Err(ImageError::InvalidImageSize(3, 3, 2, 2))
        );

        Ok(())
    }

    #[test]
    fn abs_diff_symmetric() -> Result<(), ImageError> {
        let size = ImageSize::from([2, 1]);
        let a = Image::new(size, vec![0.25f32, 1.0])?;
        let b = Image::new(size, vec![0.75f32, 0.5])?;

        let mut ab = Image::<f32>::zeros(size);
        let mut ba = Image::<f32>::zeros(size);
        super::abs_diff(&a, &b, &mut ab)?;
        super::abs_diff(&b, &a, &mut ba)?;

        assert_eq!(ab.as_slice(), &[0.5, 0.5]);
        assert_eq!(ab, ba);

        Ok(())
    }

    #[test]
    fn abs_diff_zero_width() -> Result<(), ImageError> {
        let size = ImageSize::from([0, 2]);
        let a = Image::<f32>::zeros(size);
        let mut dst = Image::<f32>::zeros(size);

        super::abs_diff(&a, &a, &mut dst)?;
        assert!(dst.as_slice().is_empty());

        Ok(())
    }

    #[test]
    fn mask_filter_empty_and_full() -> Result<(), ImageError> {
        let size = ImageSize::square(3);
        let src = Image::from_fn(size, |y, x| (y * 3 + x) as f32 / 9.0);
        let mut dst = Image::<f32>::zeros(size);

        super::mask_filter(&src, &AreaMask::full(size), &mut dst)?;
        assert_eq!(dst, src);

        super::mask_filter(&src, &AreaMask::empty(size), &mut dst)?;
        assert!(dst.as_slice().iter().all(|&v| v == 0.0));

        Ok(())
    }
}
