use rasterprep_image::{AreaMask, Image, ImageError, Label};
use rasterprep_imgproc::{
    alignment::{filter, AlignmentModel},
    translate::recenter_by_centroid,
};

use crate::dataset::Dataset;
use crate::error::PipelineError;

/// How to run the importance analysis on a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceOptions {
    /// Keep only these two classes before fitting. `None` uses every image,
    /// which then must carry exactly two distinct labels.
    pub classes: Option<[Label; 2]>,
    /// Recenter every image by its centroid before fitting.
    pub recenter: bool,
    /// Cutoff in percent of the largest class difference, in `[0, 95]`.
    pub threshold_pct: f32,
}

impl Default for ImportanceOptions {
    fn default() -> Self {
        Self {
            classes: None,
            recenter: true,
            threshold_pct: 50.0,
        }
    }
}

/// The fitted model, its mask and the filtered images.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceResult {
    /// Class means and their difference.
    pub model: AlignmentModel<Label>,
    /// Pixels kept by the threshold.
    pub mask: AreaMask,
    /// The analyzed images, recentered if requested, with unselected pixels zeroed.
    pub images: Vec<Image<f32>>,
    /// Label of each filtered image.
    pub labels: Vec<Label>,
}

/// Recenter every image on its center of mass.
pub fn recenter_all(images: &[Image<f32>]) -> Result<Vec<Image<f32>>, ImageError> {
    images
        .iter()
        .map(|image| {
            let mut centered = Image::<f32>::zeros(image.size());
            recenter_by_centroid(image, &mut centered)?;
            Ok(centered)
        })
        .collect()
}

/// Fit the class-difference model on the raw images of a dataset and filter them.
///
/// # Example
///
/// ```
/// use rasterprep_image::{Image, ImageSize, Label};
/// use rasterprep_pipeline::{analysis::{importance_filter, ImportanceOptions}, Dataset};
///
/// let size = ImageSize::square(4);
/// let left = Image::from_fn(size, |_, x| if x == 0 { 1.0 } else { 0.0 });
/// let right = Image::from_fn(size, |_, x| if x == 3 { 1.0 } else { 0.0 });
/// let dataset = Dataset::new(vec![left, right], vec![Label::from(2), Label::from(3)]).unwrap();
///
/// let options = ImportanceOptions { recenter: false, ..Default::default() };
/// let result = importance_filter(&dataset, &options).unwrap();
///
/// assert_eq!(result.mask.count(), 8);
/// ```
pub fn importance_filter(
    dataset: &Dataset,
    options: &ImportanceOptions,
) -> Result<ImportanceResult, PipelineError> {
    let subset = match &options.classes {
        Some(classes) => dataset.select_labels(classes)?,
        None => dataset.clone(),
    };

    let images = if options.recenter {
        recenter_all(subset.raw())?
    } else {
        subset.raw().to_vec()
    };

    let model = AlignmentModel::fit(&images, subset.labels())?;
    let mask = model.importance_mask(options.threshold_pct)?;

    let filtered = images
        .iter()
        .map(|image| filter(image, &mask))
        .collect::<Result<Vec<_>, _>>()?;

    log::info!(
        "kept {} of {} pixels over {} images of classes {} and {}",
        mask.count(),
        mask.size().num_pixels(),
        filtered.len(),
        model.labels()[0],
        model.labels()[1]
    );

    Ok(ImportanceResult {
        model,
        mask,
        images: filtered,
        labels: subset.labels().to_vec(),
    })
}
