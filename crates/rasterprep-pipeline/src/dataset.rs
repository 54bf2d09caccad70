use std::fmt;
use std::ops::RangeInclusive;

use rand::{seq::SliceRandom, Rng};

use rasterprep_image::{Image, ImageSize, Label};

use crate::error::DatasetError;

/// Image and label counts that disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMismatch {
    /// Number of images.
    pub images: usize,
    /// Number of labels.
    pub labels: usize,
}

impl fmt::Display for LabelMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} images but {} labels", self.images, self.labels)
    }
}

/// Raw images, their processed copies and their labels.
///
/// The raw copy is only ever replaced by loading or reordering; transforms
/// write to the processed copy. Labels are matched to images by position,
/// and a count mismatch is reported by [`Dataset::label_mismatch`] rather
/// than refused.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    raw: Vec<Image<f32>>,
    processed: Vec<Image<f32>>,
    labels: Vec<Label>,
}

fn permute<T>(items: Vec<T>, order: &[usize]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order.iter().filter_map(|&i| slots[i].take()).collect()
}

impl Dataset {
    /// Create a dataset whose processed copy starts equal to the raw images.
    ///
    /// # Errors
    ///
    /// [`DatasetError::Image`] when the images do not all share one size.
    ///
    /// # Example
    ///
    /// ```
    /// use rasterprep_image::{Image, ImageSize, Label};
    /// use rasterprep_pipeline::Dataset;
    ///
    /// let images = vec![Image::<f32>::zeros(ImageSize::square(20)); 3];
    /// let dataset = Dataset::new(images, vec![Label::from(2), Label::from(3)]).unwrap();
    ///
    /// assert_eq!(dataset.len(), 3);
    /// assert_eq!(dataset.label_mismatch().map(|m| m.labels), Some(2));
    /// ```
    pub fn new(images: Vec<Image<f32>>, labels: Vec<Label>) -> Result<Self, DatasetError> {
        let mut dataset = Self::default();
        dataset.extend(images)?;
        dataset.extend_labels(labels);
        Ok(dataset)
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the dataset holds no image.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Size shared by every image, if there is any image.
    pub fn image_size(&self) -> Option<ImageSize> {
        self.raw.first().map(Image::size)
    }

    /// The images as loaded.
    pub fn raw(&self) -> &[Image<f32>] {
        &self.raw
    }

    /// The images after the latest transforms.
    pub fn processed(&self) -> &[Image<f32>] {
        &self.processed
    }

    /// The labels, by position.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Append images, as when loading another file into the same dataset.
    pub fn extend(&mut self, images: Vec<Image<f32>>) -> Result<(), DatasetError> {
        if let Some(size) = self.image_size().or_else(|| images.first().map(Image::size)) {
            for image in &images {
                image.ensure_size(size)?;
            }
        }

        self.processed.extend(images.iter().cloned());
        self.raw.extend(images);
        self.warn_on_mismatch();

        Ok(())
    }

    /// Append labels.
    pub fn extend_labels(&mut self, labels: Vec<Label>) {
        self.labels.extend(labels);
        self.warn_on_mismatch();
    }

    fn warn_on_mismatch(&self) {
        if let Some(mismatch) = self.label_mismatch() {
            log::warn!("label count mismatch: {mismatch}");
        }
    }

    /// The mismatch between image and label counts, if any.
    ///
    /// A dataset without labels at all is not a mismatch.
    pub fn label_mismatch(&self) -> Option<LabelMismatch> {
        if self.labels.is_empty() || self.labels.len() == self.raw.len() {
            None
        } else {
            Some(LabelMismatch {
                images: self.raw.len(),
                labels: self.labels.len(),
            })
        }
    }

    /// Replace the label at `index`, returning the previous one.
    pub fn set_label(&mut self, index: usize, label: Label) -> Result<Label, DatasetError> {
        let len = self.labels.len();
        let slot = self
            .labels
            .get_mut(index)
            .ok_or(DatasetError::IndexOutOfBounds { index, len })?;
        Ok(std::mem::replace(slot, label))
    }

    /// Shuffle the images, keeping raw and processed copies paired.
    ///
    /// Labels follow their images when there is one label per image;
    /// otherwise they are left in place and a warning is logged.
    ///
    /// # Returns
    ///
    /// Whether the labels were shuffled along.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);

        self.raw = permute(std::mem::take(&mut self.raw), &order);
        self.processed = permute(std::mem::take(&mut self.processed), &order);

        if self.labels.len() == order.len() {
            self.labels = permute(std::mem::take(&mut self.labels), &order);
            true
        } else {
            if !self.labels.is_empty() {
                log::warn!(
                    "shuffled {} images but kept {} labels in place",
                    order.len(),
                    self.labels.len()
                );
            }
            false
        }
    }

    /// A new dataset with only the images whose label is in `keep`.
    ///
    /// # Errors
    ///
    /// [`DatasetError::LabelMismatch`] unless there is exactly one label per image.
    pub fn select_labels(&self, keep: &[Label]) -> Result<Dataset, DatasetError> {
        if self.labels.len() != self.raw.len() {
            return Err(DatasetError::LabelMismatch(LabelMismatch {
                images: self.raw.len(),
                labels: self.labels.len(),
            }));
        }

        let mut selected = Dataset::default();
        for ((raw, processed), label) in self.raw.iter().zip(&self.processed).zip(&self.labels) {
            if keep.contains(label) {
                selected.raw.push(raw.clone());
                selected.processed.push(processed.clone());
                selected.labels.push(label.clone());
            }
        }

        log::debug!("kept {} of {} images", selected.len(), self.len());

        Ok(selected)
    }

    /// Check that `[start, end]` is a non-empty range of image indices.
    pub fn check_range(&self, start: usize, end: usize) -> Result<(), DatasetError> {
        if start > end || end >= self.len() {
            return Err(DatasetError::InvalidRange {
                start,
                end,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Copy the raw images over the processed ones in an inclusive range.
    pub fn reset_processed(&mut self, range: RangeInclusive<usize>) -> Result<(), DatasetError> {
        let (start, end) = (*range.start(), *range.end());
        self.check_range(start, end)?;
        self.processed[start..=end].clone_from_slice(&self.raw[start..=end]);
        Ok(())
    }

    /// Store processed images starting at `start`.
    pub(crate) fn commit_processed(
        &mut self,
        start: usize,
        images: Vec<Image<f32>>,
    ) -> Result<(), DatasetError> {
        let end = start + images.len();
        if end > self.len() {
            return Err(DatasetError::InvalidRange {
                start,
                end: end.saturating_sub(1),
                len: self.len(),
            });
        }
        if let Some(size) = self.image_size() {
            for image in &images {
                image.ensure_size(size)?;
            }
        }
        for (slot, image) in self.processed[start..end].iter_mut().zip(images) {
            *slot = image;
        }
        Ok(())
    }

    /// Drop every image and label.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.processed.clear();
        self.labels.clear();
    }
}

impl TryFrom<Vec<Image<f32>>> for Dataset {
    type Error = DatasetError;

    fn try_from(images: Vec<Image<f32>>) -> Result<Self, Self::Error> {
        Dataset::new(images, Vec::new())
    }
}
