use std::io::Read;

use serde::{Deserialize, Serialize};

use rasterprep_image::{AreaMask, ImageError, ImageSize};
use rasterprep_imgproc::{
    masking::Effect,
    region::{BandDirection, GridCells, RegionError},
};

use crate::error::ConfigError;

/// Accepted zoom factors.
pub const SCALE_RANGE: (f32, f32) = (0.5, 2.5);

/// Largest shift accepted on either axis, in pixels.
pub const SHIFT_LIMIT: i32 = 10;

/// Largest rotation accepted in either direction, in degrees.
pub const ANGLE_LIMIT: f32 = 45.0;

/// Rigid adjustments applied before any region effect.
///
/// The sub-steps run in the order recenter, rotate, translate, rescale and
/// only when the stage is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Whether the stage runs at all.
    pub enabled: bool,
    /// Move the center of mass onto the grid center first.
    pub recenter: bool,
    /// Rotation in degrees, counter-clockwise.
    pub angle: f32,
    /// Columns to shift by.
    pub dx: i32,
    /// Rows to shift by.
    pub dy: i32,
    /// Zoom factor about the center.
    pub scale: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            recenter: false,
            angle: 0.0,
            dx: 0,
            dy: 0,
            scale: 1.0,
        }
    }
}

/// A hand-painted region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualConfig {
    /// Whether the stage runs at all.
    pub enabled: bool,
    /// Painted pixels as rows of flags. Empty means nothing painted.
    pub mask: Vec<Vec<bool>>,
    /// Replacement for affected pixels.
    pub effect: Effect,
    /// Percentage of painted pixels affected.
    pub density: f32,
}

impl Default for ManualConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mask: Vec::new(),
            effect: Effect::One,
            density: 100.0,
        }
    }
}

/// A band of rows at the top or bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    /// Whether the stage runs at all.
    pub enabled: bool,
    /// Number of rows in the band.
    pub rows: usize,
    /// Which end of the raster.
    pub direction: BandDirection,
    /// Replacement for affected pixels.
    pub effect: Effect,
    /// Percentage of band pixels affected.
    pub density: f32,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rows: 5,
            direction: BandDirection::Top,
            effect: Effect::Zero,
            density: 100.0,
        }
    }
}

/// Everything outside a circle around the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularConfig {
    /// Whether the stage runs at all.
    pub enabled: bool,
    /// Radius of the untouched disc.
    pub radius: f32,
    /// Replacement for affected pixels.
    pub effect: Effect,
    /// Percentage of exterior pixels affected.
    pub density: f32,
}

impl Default for CircularConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: 8.0,
            effect: Effect::Noise,
            density: 100.0,
        }
    }
}

/// Enabled cells of a square grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Whether the stage runs at all.
    pub enabled: bool,
    /// Cells per axis; 3 is read as 4.
    pub size: usize,
    /// Cell flags as rows. Empty means no cell enabled.
    pub cells: Vec<Vec<bool>>,
    /// Replacement for affected pixels.
    pub effect: Effect,
    /// Percentage of cell pixels affected.
    pub density: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: 2,
            cells: Vec::new(),
            effect: Effect::One,
            density: 100.0,
        }
    }
}

/// Every setting of the augmentation pipeline.
///
/// The value is read once to build a [`crate::Pipeline`] and never observed
/// while the pipeline runs. Every stage is disabled by default, which makes
/// the default pipeline the identity.
///
/// # Example
///
/// ```
/// use rasterprep_image::ImageSize;
/// use rasterprep_pipeline::TransformConfig;
///
/// let json = r#"{ "band": { "enabled": true, "rows": 3, "direction": "bottom" } }"#;
/// let config = TransformConfig::from_json_reader(json.as_bytes()).unwrap();
///
/// assert_eq!(config.band.rows, 3);
/// assert_eq!(config.band.density, 100.0);
/// assert!(config.validate(ImageSize::square(20)).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Recenter, rotate, translate and rescale.
    pub geometry: GeometryConfig,
    /// Hand-painted region.
    pub manual: ManualConfig,
    /// Row band region.
    pub band: BandConfig,
    /// Circular exterior region.
    pub circular: CircularConfig,
    /// Grid cell region.
    pub grid: GridConfig,
    /// Upper bound of injected noise, shared by every noise effect.
    pub intensity: f32,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            geometry: GeometryConfig::default(),
            manual: ManualConfig::default(),
            band: BandConfig::default(),
            circular: CircularConfig::default(),
            grid: GridConfig::default(),
            intensity: 1.0,
        }
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

impl TransformConfig {
    /// Read a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Render the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every option against its range for rasters of `size`.
    ///
    /// `size` itself must be a non-empty square. Disabled stages are checked
    /// too, so a configuration that validates stays valid whichever stages
    /// are switched on later.
    pub fn validate(&self, size: ImageSize) -> Result<(), ConfigError> {
        let n = size.side()? as f64;
        let g = &self.geometry;

        check_range(
            "geometry.scale",
            g.scale as f64,
            SCALE_RANGE.0 as f64,
            SCALE_RANGE.1 as f64,
        )?;
        let shift = SHIFT_LIMIT as f64;
        check_range("geometry.dx", g.dx as f64, -shift, shift)?;
        check_range("geometry.dy", g.dy as f64, -shift, shift)?;
        let angle = ANGLE_LIMIT as f64;
        check_range("geometry.angle", g.angle as f64, -angle, angle)?;

        check_range("band.rows", self.band.rows as f64, 0.0, n)?;
        check_range("circular.radius", self.circular.radius as f64, 0.0, n)?;

        check_range("manual.density", self.manual.density as f64, 0.0, 100.0)?;
        check_range("band.density", self.band.density as f64, 0.0, 100.0)?;
        check_range("circular.density", self.circular.density as f64, 0.0, 100.0)?;
        check_range("grid.density", self.grid.density as f64, 0.0, 100.0)?;
        check_range("intensity", self.intensity as f64, 0.0, 1.0)?;

        self.grid_cells()?;
        self.manual_mask(size)?;

        Ok(())
    }

    /// Pull every option into its range for rasters of `size`.
    ///
    /// Grid sizes snap to the nearest supported count, NaN values fall back
    /// to their defaults, and cell or mask matrices of the wrong shape are
    /// dropped. For a non-empty square `size` the result always passes
    /// [`TransformConfig::validate`].
    pub fn clamped(&self, size: ImageSize) -> Self {
        let defaults = TransformConfig::default();
        let mut c = self.clone();
        let n = size.width.min(size.height) as f32;

        let g = &mut c.geometry;
        g.scale = clamp_or(g.scale, SCALE_RANGE.0, SCALE_RANGE.1, 1.0);
        g.dx = g.dx.clamp(-SHIFT_LIMIT, SHIFT_LIMIT);
        g.dy = g.dy.clamp(-SHIFT_LIMIT, SHIFT_LIMIT);
        g.angle = clamp_or(g.angle, -ANGLE_LIMIT, ANGLE_LIMIT, 0.0);

        c.band.rows = c.band.rows.min(size.height);
        c.circular.radius = clamp_or(c.circular.radius, 0.0, n, defaults.circular.radius.min(n));

        for density in [
            &mut c.manual.density,
            &mut c.band.density,
            &mut c.circular.density,
            &mut c.grid.density,
        ] {
            *density = clamp_or(*density, 0.0, 100.0, 100.0);
        }
        c.intensity = clamp_or(c.intensity, 0.0, 1.0, defaults.intensity);

        c.grid.size = match c.grid.size {
            0..=2 => 2,
            3 | 4 => 4,
            _ => 5,
        };
        if c.grid_cells().is_err() {
            log::warn!("dropping grid cells that do not fit a {0}x{0} grid", c.grid.size);
            c.grid.cells.clear();
        }
        if c.manual_mask(size).is_err() {
            log::warn!("dropping manual mask that does not fit {size}");
            c.manual.mask.clear();
        }

        c
    }

    /// The grid described by `grid.size` and `grid.cells`.
    pub fn grid_cells(&self) -> Result<GridCells, RegionError> {
        if self.grid.cells.is_empty() {
            GridCells::new(self.grid.size)
        } else {
            GridCells::from_rows(self.grid.size, &self.grid.cells)
        }
    }

    /// The painted mask for rasters of `size`.
    pub fn manual_mask(&self, size: ImageSize) -> Result<AreaMask, RegionError> {
        let rows = &self.manual.mask;
        if rows.is_empty() {
            return Ok(AreaMask::empty(size));
        }

        let cols = rows.first().map_or(0, Vec::len);
        if rows.len() != size.height || rows.iter().any(|r| r.len() != size.width) {
            return Err(
                ImageError::InvalidImageSize(cols, rows.len(), size.width, size.height).into(),
            );
        }

        Ok(AreaMask::new(size, rows.iter().flatten().copied().collect())?)
    }
}

#[cfg(test)]
mod tests {
    use rasterprep_image::{ImageError, ImageSize};
    use rasterprep_imgproc::{
        masking::Effect,
        region::{BandDirection, RegionError},
    };

    use super::TransformConfig;
    use crate::error::ConfigError;

    #[test]
    fn defaults_match_the_editing_tool() {
        let c = TransformConfig::default();

        assert_eq!(c.geometry.scale, 1.0);
        assert_eq!(c.intensity, 1.0);
        assert_eq!(c.band.rows, 5);
        assert_eq!(c.band.direction, BandDirection::Top);
        assert_eq!(c.band.effect, Effect::Zero);
        assert_eq!(c.circular.radius, 8.0);
        assert_eq!(c.circular.effect, Effect::Noise);
        assert_eq!(c.grid.size, 2);
        assert_eq!(c.grid.effect, Effect::One);
        assert_eq!(c.manual.effect, Effect::One);
        assert!(!c.geometry.enabled && !c.manual.enabled && !c.band.enabled);
        assert!(!c.circular.enabled && !c.grid.enabled);
        assert!(c.validate(ImageSize::square(20)).is_ok());
    }

    #[test]
    fn json_fills_missing_fields() -> Result<(), ConfigError> {
        let json = r#"{
            "geometry": { "enabled": true, "angle": -30.0, "dx": 2 },
            "grid": { "enabled": true, "size": 4, "effect": "noise" },
            "intensity": 0.4
        }"#;
        let c = TransformConfig::from_json_reader(json.as_bytes())?;

        assert!(c.geometry.enabled);
        assert_eq!(c.geometry.angle, -30.0);
        assert_eq!((c.geometry.dx, c.geometry.dy), (2, 0));
        assert_eq!(c.geometry.scale, 1.0);
        assert_eq!(c.grid.effect, Effect::Noise);
        assert_eq!(c.intensity, 0.4);
        assert_eq!(c.band, TransformConfig::default().band);

        let again = TransformConfig::from_json_reader(c.to_json_string()?.as_bytes())?;
        assert_eq!(again, c);

        Ok(())
    }

    #[test]
    fn unknown_effect_is_a_parse_error() {
        let res = TransformConfig::from_json_reader(r#"{"band": {"effect": "blur"}}"#.as_bytes());
        assert!(matches!(res, Err(ConfigError::Json(_))));
    }

    #[test]
    fn validate_reports_the_field() {
        let size = ImageSize::square(20);

        let mut c = TransformConfig::default();
        c.geometry.scale = 3.0;
        assert!(matches!(
            c.validate(size),
            Err(ConfigError::OutOfRange { field: "geometry.scale", .. })
        ));

        let mut c = TransformConfig::default();
        c.geometry.dy = -11;
        assert!(matches!(
            c.validate(size),
            Err(ConfigError::OutOfRange { field: "geometry.dy", .. })
        ));

        let mut c = TransformConfig::default();
        c.band.rows = 21;
        assert!(matches!(
            c.validate(size),
            Err(ConfigError::OutOfRange { field: "band.rows", .. })
        ));

        let mut c = TransformConfig::default();
        c.circular.density = f32::NAN;
        assert!(matches!(
            c.validate(size),
            Err(ConfigError::OutOfRange { field: "circular.density", .. })
        ));

        let mut c = TransformConfig::default();
        c.grid.size = 6;
        assert!(matches!(
            c.validate(size),
            Err(ConfigError::Region(RegionError::UnsupportedGridSize(6)))
        ));

        let mut c = TransformConfig::default();
        c.manual.mask = vec![vec![true; 19]; 20];
        assert!(matches!(
            c.validate(size),
            Err(ConfigError::Region(RegionError::Image(
                ImageError::InvalidImageSize(19, 20, 20, 20)
            )))
        ));
    }

    #[test]
    fn validate_requires_a_square_raster() {
        // options that would fit any size
        let mut c = TransformConfig::default();
        c.band.rows = 0;
        c.circular.radius = 0.0;

        assert!(matches!(
            c.validate(ImageSize::from([20, 7])),
            Err(ConfigError::Image(ImageError::NotSquare(20, 7)))
        ));
        assert!(matches!(
            c.validate(ImageSize::square(0)),
            Err(ConfigError::Image(ImageError::EmptyImage))
        ));
        assert!(c.validate(ImageSize::square(7)).is_ok());
    }

    #[test]
    fn clamped_always_validates() {
        let size = ImageSize::square(20);

        let mut c = TransformConfig::default();
        c.geometry.scale = 0.1;
        c.geometry.dx = 40;
        c.geometry.angle = f32::NAN;
        c.band.rows = 100;
        c.circular.radius = -2.0;
        c.grid.size = 3;
        c.grid.cells = vec![vec![true; 3]; 3];
        c.manual.mask = vec![vec![true; 4]];
        c.band.density = 250.0;
        c.intensity = 2.0;

        let clamped = c.clamped(size);
        assert!(clamped.validate(size).is_ok());

        assert_eq!(clamped.geometry.scale, 0.5);
        assert_eq!(clamped.geometry.dx, 10);
        assert_eq!(clamped.geometry.angle, 0.0);
        assert_eq!(clamped.band.rows, 20);
        assert_eq!(clamped.circular.radius, 0.0);
        assert_eq!(clamped.grid.size, 4);
        assert!(clamped.grid.cells.is_empty());
        assert!(clamped.manual.mask.is_empty());
        assert_eq!(clamped.band.density, 100.0);
        assert_eq!(clamped.intensity, 1.0);
    }

    #[test]
    fn grid_size_three_reads_as_four() -> Result<(), RegionError> {
        let mut c = TransformConfig::default();
        c.grid.size = 3;
        c.grid.cells = vec![vec![false; 4]; 4];
        c.grid.cells[2][1] = true;

        let cells = c.grid_cells()?;
        assert_eq!(cells.size(), 4);
        assert!(cells.is_enabled(2, 1));

        Ok(())
    }
}
