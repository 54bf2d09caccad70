use rand::Rng;

use rasterprep_image::{AreaMask, Image, ImageError, ImageSize};
use rasterprep_imgproc::{
    masking::{apply_effect, Effect},
    region::Region,
    resize::rescale,
    translate::{recenter_by_centroid, translate},
    warp::rotate,
};

use crate::config::TransformConfig;
use crate::dataset::Dataset;
use crate::error::{ConfigError, PipelineError};

/// One step of a [`Pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Move the center of mass onto the grid center.
    Recenter,
    /// Rotate about the center by this many degrees.
    Rotate(f32),
    /// Shift by whole pixels.
    Translate {
        /// Columns, positive to the right.
        dx: i32,
        /// Rows, positive downwards.
        dy: i32,
    },
    /// Zoom about the center.
    Rescale(f32),
    /// Apply an effect inside a precomputed region.
    Mask {
        /// Which region produced the mask.
        region: &'static str,
        /// The selected pixels.
        mask: AreaMask,
        /// The replacement for affected pixels.
        effect: Effect,
        /// Percentage of selected pixels affected.
        density: f32,
    },
}

impl Stage {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Recenter => "recenter",
            Stage::Rotate(_) => "rotate",
            Stage::Translate { .. } => "translate",
            Stage::Rescale(_) => "rescale",
            Stage::Mask { region, .. } => *region,
        }
    }
}

/// The result of running a pipeline on one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    /// The transformed image.
    pub image: Image<f32>,
    /// Capabilities missing from this build; their stages ran as identity.
    pub unavailable: Vec<&'static str>,
}

/// Summary of a committed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// First processed index.
    pub start: usize,
    /// Last processed index, inclusive.
    pub end: usize,
    /// Capabilities missing from this build, each listed once.
    pub unavailable: Vec<&'static str>,
}

impl BatchReport {
    /// Number of images written.
    pub fn processed(&self) -> usize {
        self.end - self.start + 1
    }
}

/// An ordered list of enabled stages for rasters of one size.
///
/// Geometry comes first (recenter, rotate, translate, rescale), then the
/// regions in priority order manual, band, circular, grid. Later regions
/// overwrite earlier ones where they overlap.
///
/// # Example
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use rasterprep_image::{Image, ImageSize};
/// use rasterprep_pipeline::{Pipeline, TransformConfig};
///
/// let size = ImageSize::square(20);
/// let mut config = TransformConfig::default();
/// config.band.enabled = true;
/// config.band.rows = 2;
///
/// let pipeline = Pipeline::from_config(&config, size).unwrap();
/// let image = Image::<f32>::from_size_val(size, 0.5).unwrap();
///
/// let outcome = pipeline.apply(&image, &mut StdRng::seed_from_u64(0)).unwrap();
/// assert_eq!(outcome.image.row(0), Some(&[0.0; 20][..]));
/// assert_eq!(outcome.image.row(2), image.row(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    size: ImageSize,
    stages: Vec<Stage>,
    intensity: f32,
}

impl Pipeline {
    /// Validate a configuration and build the pipeline it describes.
    ///
    /// Region masks are computed here once, so applying the pipeline only
    /// costs the per-pixel work.
    pub fn from_config(config: &TransformConfig, size: ImageSize) -> Result<Self, ConfigError> {
        config.validate(size)?;

        let mut stages = Vec::new();

        let g = &config.geometry;
        if g.enabled {
            if g.recenter {
                stages.push(Stage::Recenter);
            }
            if g.angle != 0.0 {
                stages.push(Stage::Rotate(g.angle));
            }
            if g.dx != 0 || g.dy != 0 {
                stages.push(Stage::Translate { dx: g.dx, dy: g.dy });
            }
            if g.scale != 1.0 {
                stages.push(Stage::Rescale(g.scale));
            }
        }

        let regions = [
            (
                config.manual.enabled,
                Region::Manual(config.manual_mask(size)?),
                config.manual.effect,
                config.manual.density,
            ),
            (
                config.band.enabled,
                Region::Band {
                    rows: config.band.rows,
                    direction: config.band.direction,
                },
                config.band.effect,
                config.band.density,
            ),
            (
                config.circular.enabled,
                Region::Circular {
                    radius: config.circular.radius,
                },
                config.circular.effect,
                config.circular.density,
            ),
            (
                config.grid.enabled,
                Region::Grid(config.grid_cells()?),
                config.grid.effect,
                config.grid.density,
            ),
        ];

        for (enabled, region, effect, density) in regions {
            if enabled {
                stages.push(Stage::Mask {
                    region: region.name(),
                    mask: region.area_mask(size)?,
                    effect,
                    density,
                });
            }
        }

        log::debug!(
            "pipeline for {size}: [{}]",
            stages
                .iter()
                .map(Stage::name)
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            size,
            stages,
            intensity: config.intensity,
        })
    }

    /// Size of the rasters this pipeline accepts.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// The enabled stages in execution order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Whether no stage is enabled.
    pub fn is_identity(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage on one image.
    ///
    /// The input is never modified. A rotation requested from a build
    /// without the `rotation` feature leaves the image as it is and is listed
    /// in [`ApplyOutcome::unavailable`].
    ///
    /// # Errors
    ///
    /// [`ImageError::InvalidImageSize`] when `image` is not of the pipeline size.
    pub fn apply<R: Rng>(
        &self,
        image: &Image<f32>,
        rng: &mut R,
    ) -> Result<ApplyOutcome, ImageError> {
        image.ensure_size(self.size)?;

        let mut current = image.clone();
        let mut next = Image::<f32>::zeros(self.size);
        let mut unavailable = Vec::new();

        for stage in &self.stages {
            match stage {
                Stage::Recenter => {
                    recenter_by_centroid(&current, &mut next)?;
                }
                Stage::Rotate(angle) => match rotate(&current, &mut next, *angle) {
                    Ok(()) => {}
                    Err(ImageError::CapabilityUnavailable(capability)) => {
                        log::debug!("{capability} unavailable, stage left the image unchanged");
                        unavailable.push(capability);
                    }
                    Err(e) => return Err(e),
                },
                Stage::Translate { dx, dy } => translate(&current, &mut next, *dx, *dy)?,
                Stage::Rescale(scale) => rescale(&current, &mut next, *scale)?,
                Stage::Mask {
                    mask,
                    effect,
                    density,
                    ..
                } => apply_effect(
                    &current,
                    &mut next,
                    mask,
                    *effect,
                    *density,
                    self.intensity,
                    rng,
                )?,
            }
            std::mem::swap(&mut current, &mut next);
        }

        Ok(ApplyOutcome {
            image: current,
            unavailable,
        })
    }

    /// Run the pipeline on the raw images `start..=end` of a dataset.
    ///
    /// Every result is computed before anything is stored: if one image
    /// fails, the dataset is left untouched and the error names its index.
    /// Raw images are never modified.
    pub fn apply_batch<R: Rng>(
        &self,
        dataset: &mut Dataset,
        start: usize,
        end: usize,
        rng: &mut R,
    ) -> Result<BatchReport, PipelineError> {
        dataset.check_range(start, end)?;

        let mut results = Vec::with_capacity(end - start + 1);
        let mut unavailable: Vec<&'static str> = Vec::new();

        for (index, image) in dataset.raw().iter().enumerate().take(end + 1).skip(start) {
            let outcome = self
                .apply(image, rng)
                .map_err(|source| PipelineError::Batch { index, source })?;
            for capability in outcome.unavailable {
                if !unavailable.contains(&capability) {
                    unavailable.push(capability);
                }
            }
            results.push(outcome.image);
        }

        dataset.commit_processed(start, results)?;

        for capability in &unavailable {
            log::warn!("{capability} is not available in this build and was skipped");
        }
        log::info!("processed images {start} to {end}");

        Ok(BatchReport {
            start,
            end,
            unavailable,
        })
    }
}
