//! Intensity moments of a raster.

use rasterprep_image::Image;

/// Intensity-weighted center of mass of a raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    /// Column coordinate of the center of mass.
    pub x: f32,
    /// Row coordinate of the center of mass.
    pub y: f32,
    /// Total mass (sum of all intensities).
    pub mass: f32,
}

/// Compute the intensity-weighted centroid of a raster.
///
/// Sums are accumulated in `f64` so that 400 pixel rasters and larger keep
/// sub-pixel precision.
///
/// # Returns
///
/// `None` when the total mass is not strictly positive, since an empty image
/// has no meaningful centroid.
///
/// # Example
///
/// ```
/// use rasterprep_image::{Image, ImageSize};
/// use rasterprep_imgproc::moments::mass_centroid;
///
/// let mut image = Image::<f32>::zeros(ImageSize::square(5));
/// *image.get_mut([1, 3]).unwrap() = 1.0;
///
/// let c = mass_centroid(&image).unwrap();
/// assert_eq!((c.x, c.y), (3.0, 1.0));
/// ```
pub fn mass_centroid(image: &Image<f32>) -> Option<Centroid> {
    let cols = image.cols();
    let (mut mass, mut sum_x, mut sum_y) = (0f64, 0f64, 0f64);

    for (i, &v) in image.as_slice().iter().enumerate() {
        let v = v as f64;
        mass += v;
        sum_x += (i % cols) as f64 * v;
        sum_y += (i / cols) as f64 * v;
    }

    if mass <= 0.0 {
        return None;
    }

    Some(Centroid {
        x: (sum_x / mass) as f32,
        y: (sum_y / mass) as f32,
        mass: mass as f32,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rasterprep_image::{Image, ImageError, ImageSize};

    #[test]
    fn centroid_zero_mass() {
        let image = Image::<f32>::zeros(ImageSize::square(4));
        assert_eq!(super::mass_centroid(&image), None);
    }

    #[test]
    fn centroid_weighted() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::new(ImageSize::square(3), vec![
            1.0f32, 0.0, 0.0,
            0.0, 0.0, 0.0,
            0.0, 0.0, 3.0,
        ])?;

        let c = super::mass_centroid(&image).ok_or(ImageError::EmptyImage)?;
        assert_relative_eq!(c.x, 1.5);
        assert_relative_eq!(c.y, 1.5);
        assert_relative_eq!(c.mass, 4.0);

        Ok(())
    }
}
