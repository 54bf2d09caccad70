use rand::Rng;

use rasterprep_image::{AreaMask, Image, ImageError};

/// What an affected pixel becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Effect {
    /// Set to `0.0`.
    Zero,
    /// Set to `1.0`.
    One,
    /// Set to a uniform draw in `[0, 1)` scaled by the noise intensity.
    Noise,
}

impl Effect {
    /// Short name used in logs and configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Zero => "zero",
            Effect::One => "one",
            Effect::Noise => "noise",
        }
    }
}

/// Apply an effect to a random subset of the masked pixels.
///
/// Masked pixels are visited in row-major order. Each one draws a uniform
/// `u` in `[0, 1)` and is affected when `u < density / 100`; a [`Effect::Noise`]
/// pixel then draws its value. Pixels outside the mask are copied unchanged,
/// so the same generator state always reproduces the same output.
///
/// # Arguments
///
/// * `src` - The input raster.
/// * `dst` - The output raster, same size as `src`.
/// * `mask` - The selected area, same size as `src`.
/// * `effect` - The replacement applied to affected pixels.
/// * `density` - Percentage of masked pixels to affect, in `[0, 100]`.
/// * `intensity` - Scale of the noise draw, in `[0, 1]`. Ignored by the other effects.
/// * `rng` - The random source.
///
/// # Example
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use rasterprep_image::{AreaMask, Image, ImageSize};
/// use rasterprep_imgproc::masking::{apply_effect, Effect};
///
/// let size = ImageSize::square(4);
/// let src = Image::<f32>::zeros(size);
/// let mut dst = Image::<f32>::zeros(size);
/// let mask = AreaMask::from_fn(size, |y, _| y == 0);
///
/// let mut rng = StdRng::seed_from_u64(42);
/// apply_effect(&src, &mut dst, &mask, Effect::One, 100.0, 1.0, &mut rng).unwrap();
/// assert_eq!(dst.total_mass(), 4.0);
/// ```
pub fn apply_effect(
    src: &Image<f32>,
    dst: &mut Image<f32>,
    mask: &AreaMask,
    effect: Effect,
    density: f32,
    intensity: f32,
    rng: &mut impl Rng,
) -> Result<(), ImageError> {
    dst.ensure_size(src.size())?;
    mask.ensure_size(src.size())?;

    dst.as_slice_mut().copy_from_slice(src.as_slice());

    if density <= 0.0 {
        return Ok(());
    }

    let threshold = density / 100.0;
    let intensity = intensity.clamp(0.0, 1.0);

    let mut affected = 0usize;
    for (pixel, _) in dst
        .as_slice_mut()
        .iter_mut()
        .zip(mask.as_slice())
        .filter(|(_, selected)| **selected)
    {
        if rng.random::<f32>() >= threshold {
            continue;
        }
        *pixel = match effect {
            Effect::Zero => 0.0,
            Effect::One => 1.0,
            Effect::Noise => rng.random::<f32>() * intensity,
        };
        affected += 1;
    }

    log::trace!(
        "{} effect on {affected} of {} masked pixels",
        effect.name(),
        mask.count()
    );

    Ok(())
}
