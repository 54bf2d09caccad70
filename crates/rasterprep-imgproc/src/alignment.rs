//! Two-class difference analysis.
//!
//! Fitting averages the (usually recentered) images of each class and keeps
//! the absolute difference of the two means. Pixels where the classes differ
//! most are the discriminative ones; [`AlignmentModel::importance_mask`]
//! selects them and [`filter`] zeroes everything else.

use std::fmt::Debug;

use rasterprep_image::{AreaMask, Image, ImageError};

use crate::core::{abs_diff, mask_filter, mean_image};
use crate::threshold::threshold_mask;

/// Highest importance threshold accepted, in percent of the maximum difference.
pub const MAX_IMPORTANCE_THRESHOLD: f32 = 95.0;

/// An error type for the difference analysis.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AlignmentError {
    /// Image and label counts differ.
    #[error("Got {images} images but {labels} labels")]
    MismatchedLengths {
        /// Number of images.
        images: usize,
        /// Number of labels.
        labels: usize,
    },

    /// No images to fit on.
    #[error("Cannot fit on an empty image set")]
    EmptyImageSet,

    /// The set does not contain exactly two distinct labels.
    #[error("Expected exactly two distinct labels, found {0}")]
    LabelCount(usize),

    /// The importance threshold is outside `[0, 95]`.
    #[error("Importance threshold {0} is outside [0, 95]")]
    InvalidThreshold(f32),

    /// Image level failure, e.g. images of different sizes.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Mean image per class and their absolute difference.
///
/// Read-only once fitted.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentModel<L> {
    labels: [L; 2],
    means: [Image<f32>; 2],
    counts: [usize; 2],
    diff_map: Image<f32>,
    max_diff: f32,
}

impl<L: PartialEq + Clone + Debug> AlignmentModel<L> {
    /// Fit the model on a labelled image set.
    ///
    /// The two classes are taken in order of first appearance in `labels`.
    ///
    /// # Arguments
    ///
    /// * `images` - The rasters, all of the same size.
    /// * `labels` - One label per raster, exactly two distinct values.
    ///
    /// # Example
    ///
    /// ```
    /// use rasterprep_image::{Image, ImageSize};
    /// use rasterprep_imgproc::alignment::AlignmentModel;
    ///
    /// let size = ImageSize::square(2);
    /// let images = vec![
    ///     Image::<f32>::new(size, vec![1.0, 0.0, 0.0, 0.0]).unwrap(),
    ///     Image::<f32>::new(size, vec![0.0, 0.0, 0.0, 1.0]).unwrap(),
    /// ];
    ///
    /// let model = AlignmentModel::fit(&images, &[2, 3]).unwrap();
    /// assert_eq!(model.labels(), &[2, 3]);
    /// assert_eq!(model.max_diff(), 1.0);
    /// ```
    pub fn fit(images: &[Image<f32>], labels: &[L]) -> Result<Self, AlignmentError> {
        if images.len() != labels.len() {
            return Err(AlignmentError::MismatchedLengths {
                images: images.len(),
                labels: labels.len(),
            });
        }
        if images.is_empty() {
            return Err(AlignmentError::EmptyImageSet);
        }

        let mut distinct: Vec<&L> = Vec::with_capacity(2);
        for label in labels {
            if !distinct.contains(&label) {
                distinct.push(label);
            }
        }
        let [first, second] = distinct.as_slice() else {
            return Err(AlignmentError::LabelCount(distinct.len()));
        };

        let group = |target: &L| -> Vec<Image<f32>> {
            images
                .iter()
                .zip(labels)
                .filter(|(_, l)| *l == target)
                .map(|(image, _)| image.clone())
                .collect()
        };
        let (group_a, group_b) = (group(*first), group(*second));

        let mean_a = mean_image(&group_a)?;
        let mean_b = mean_image(&group_b)?;

        let mut diff_map = Image::<f32>::zeros(mean_a.size());
        abs_diff(&mean_a, &mean_b, &mut diff_map)?;
        let max_diff = diff_map.max_value();

        log::debug!(
            "fitted {:?} ({} images) against {:?} ({} images), max difference {max_diff:.4}",
            first,
            group_a.len(),
            second,
            group_b.len()
        );

        Ok(Self {
            labels: [(*first).clone(), (*second).clone()],
            means: [mean_a, mean_b],
            counts: [group_a.len(), group_b.len()],
            diff_map,
            max_diff,
        })
    }
}

impl<L> AlignmentModel<L> {
    /// The two class labels, in order of first appearance.
    pub fn labels(&self) -> &[L; 2] {
        &self.labels
    }

    /// Mean image of each class.
    pub fn means(&self) -> &[Image<f32>; 2] {
        &self.means
    }

    /// Number of images in each class.
    pub fn counts(&self) -> [usize; 2] {
        self.counts
    }

    /// Absolute difference of the two class means.
    pub fn diff_map(&self) -> &Image<f32> {
        &self.diff_map
    }

    /// Largest value of the difference map.
    pub fn max_diff(&self) -> f32 {
        self.max_diff
    }

    /// Select the pixels whose difference reaches a fraction of the maximum.
    ///
    /// The cutoff is `threshold_pct / 100 * max_diff` and the comparison is
    /// inclusive, so a threshold of 0 selects every pixel and raising the
    /// threshold never grows the selection.
    ///
    /// # Errors
    ///
    /// [`AlignmentError::InvalidThreshold`] when `threshold_pct` is outside `[0, 95]`.
    pub fn importance_mask(&self, threshold_pct: f32) -> Result<AreaMask, AlignmentError> {
        if !(0.0..=MAX_IMPORTANCE_THRESHOLD).contains(&threshold_pct) {
            return Err(AlignmentError::InvalidThreshold(threshold_pct));
        }

        let cutoff = threshold_pct / 100.0 * self.max_diff;
        let mask = threshold_mask(&self.diff_map, cutoff)?;

        log::debug!(
            "importance threshold {threshold_pct}% (cutoff {cutoff:.4}) keeps {} of {} pixels",
            mask.count(),
            mask.size().num_pixels()
        );

        Ok(mask)
    }
}

/// Zero every pixel of `image` that `mask` does not select.
///
/// # Errors
///
/// [`ImageError::InvalidImageSize`] when the mask and image sizes differ.
pub fn filter(image: &Image<f32>, mask: &AreaMask) -> Result<Image<f32>, ImageError> {
    let mut dst = Image::<f32>::zeros(image.size());
    mask_filter(image, mask, &mut dst)?;
    Ok(dst)
}
