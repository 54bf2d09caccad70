use std::ops;

use crate::error::ImageError;
use crate::image::{Image, ImageSize};

/// A boolean selection grid with the same dimensions as the image it targets.
///
/// `true` marks a selected pixel. Masks never change size after creation and
/// every operation combining a mask with an image or another mask checks that
/// the sizes agree.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaMask(Image<bool>);

/// helper to dereference the inner grid
impl ops::Deref for AreaMask {
    type Target = Image<bool>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AreaMask {
    /// Create a mask from row-major selection flags.
    ///
    /// # Examples
    ///
    /// ```
    /// use rasterprep_image::{AreaMask, ImageSize};
    ///
    /// let mask = AreaMask::new(ImageSize::square(2), vec![true, false, false, true]).unwrap();
    /// assert_eq!(mask.count(), 2);
    /// ```
    pub fn new(size: ImageSize, data: Vec<bool>) -> Result<Self, ImageError> {
        Ok(Self(Image::new(size, data)?))
    }

    /// A mask selecting nothing.
    pub fn empty(size: ImageSize) -> Self {
        Self(Image::from_fn(size, |_, _| false))
    }

    /// A mask selecting every pixel.
    pub fn full(size: ImageSize) -> Self {
        Self(Image::from_fn(size, |_, _| true))
    }

    /// Create a mask by evaluating `f(y, x)` for every pixel.
    pub fn from_fn(size: ImageSize, f: impl FnMut(usize, usize) -> bool) -> Self {
        Self(Image::from_fn(size, f))
    }

    /// Whether the pixel at `[y, x]` is selected. Out of bounds pixels are not.
    pub fn is_selected(&self, y: usize, x: usize) -> bool {
        self.0.get([y, x]).copied().unwrap_or(false)
    }

    /// Select or deselect the pixel at `[y, x]`.
    ///
    /// # Errors
    ///
    /// [`ImageError::PixelIndexOutOfBounds`] when the pixel lies outside the mask.
    pub fn set(&mut self, y: usize, x: usize, selected: bool) -> Result<(), ImageError> {
        let (w, h) = (self.width(), self.height());
        match self.0.get_mut([y, x]) {
            Some(p) => {
                *p = selected;
                Ok(())
            }
            None => Err(ImageError::PixelIndexOutOfBounds(x, y, w, h)),
        }
    }

    /// Flip the selection of the pixel at `[y, x]`, as a paint brush toggle does.
    pub fn toggle(&mut self, y: usize, x: usize) -> Result<(), ImageError> {
        let selected = self.is_selected(y, x);
        self.set(y, x, !selected)
    }

    /// Number of selected pixels.
    pub fn count(&self) -> usize {
        self.as_slice().iter().filter(|&&s| s).count()
    }

    /// Whether no pixel is selected.
    pub fn is_empty(&self) -> bool {
        !self.as_slice().iter().any(|&s| s)
    }

    /// Pixel-wise OR of two masks of equal size.
    pub fn union(&self, other: &AreaMask) -> Result<AreaMask, ImageError> {
        self.combine(other, |a, b| a || b)
    }

    /// Pixel-wise AND of two masks of equal size.
    pub fn intersection(&self, other: &AreaMask) -> Result<AreaMask, ImageError> {
        self.combine(other, |a, b| a && b)
    }

    /// Whether every pixel selected here is also selected in `other`.
    pub fn is_subset_of(&self, other: &AreaMask) -> Result<bool, ImageError> {
        other.ensure_size(self.size())?;
        Ok(self
            .as_slice()
            .iter()
            .zip(other.as_slice())
            .all(|(&a, &b)| !a || b))
    }

    /// Convert the mask into a `0.0` / `1.0` raster for multiplicative filtering.
    pub fn to_weights(&self) -> Image<f32> {
        Image::from_fn(self.size(), |y, x| {
            if self.is_selected(y, x) {
                1.0
            } else {
                0.0
            }
        })
    }

    fn combine(
        &self,
        other: &AreaMask,
        op: impl Fn(bool, bool) -> bool,
    ) -> Result<AreaMask, ImageError> {
        other.ensure_size(self.size())?;
        let data = self
            .as_slice()
            .iter()
            .zip(other.as_slice())
            .map(|(&a, &b)| op(a, b))
            .collect();
        AreaMask::new(self.size(), data)
    }
}

#[cfg(test)]
mod tests {
    use super::AreaMask;
    use crate::{ImageError, ImageSize};

    #[test]
    fn mask_empty_full() {
        let size = ImageSize::square(3);
        assert_eq!(AreaMask::empty(size).count(), 0);
        assert!(AreaMask::empty(size).is_empty());
        assert_eq!(AreaMask::full(size).count(), 9);
    }

    #[test]
    fn mask_set_toggle() -> Result<(), ImageError> {
        let mut mask = AreaMask::empty(ImageSize::square(3));
        mask.set(1, 2, true)?;
        assert!(mask.is_selected(1, 2));
        mask.toggle(1, 2)?;
        assert!(!mask.is_selected(1, 2));
        assert_eq!(
            mask.set(3, 0, true),
            Err(ImageError::PixelIndexOutOfBounds(0, 3, 3, 3))
        );

        Ok(())
    }

    #[test]
    fn mask_union_intersection() -> Result<(), ImageError> {
        let size = ImageSize::square(2);
        let a = AreaMask::new(size, vec![true, true, false, false])?;
        let b = AreaMask::new(size, vec![false, true, true, false])?;

        assert_eq!(a.union(&b)?.as_slice(), &[true, true, true, false]);
        assert_eq!(a.intersection(&b)?.as_slice(), &[false, true, false, false]);
        assert!(a.intersection(&b)?.is_subset_of(&a)?);
        assert!(!a.is_subset_of(&b)?);

        Ok(())
    }

    #[test]
    fn mask_size_mismatch() {
        let a = AreaMask::full(ImageSize::square(2));
        let b = AreaMask::full(ImageSize::square(3));
        assert_eq!(
            a.union(&b),
            Err(ImageError::InvalidImageSize(3, 3, 2, 2))
        );
    }

    #[test]
    fn mask_weights() -> Result<(), ImageError> {
        let mask = AreaMask::new(ImageSize::square(2), vec![true, false, false, true])?;
        assert_eq!(mask.to_weights().as_slice(), &[1.0, 0.0, 0.0, 1.0]);

        Ok(())
    }
}
