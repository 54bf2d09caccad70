//! Area selection over a square raster.
//!
//! A [`Region`] only describes *where* an effect applies; it produces an
//! [`AreaMask`] and never touches pixel values. Effects are applied by
//! [`crate::masking`].

use std::ops::Range;

use rasterprep_image::{AreaMask, ImageError, ImageSize};

/// Grid partition counts accepted per axis.
pub const SUPPORTED_GRID_SIZES: [usize; 3] = [2, 4, 5];

/// An error type for region selection.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RegionError {
    /// The requested grid partition count is not supported.
    #[error("Unsupported grid size {0}, expected one of 2, 4 or 5")]
    UnsupportedGridSize(usize),

    /// The cell enable matrix does not have `size x size` entries.
    #[error("Grid cell matrix must be {expected}x{expected}, got {rows} rows with {cols} columns")]
    CellMatrixShape {
        /// Effective grid size.
        expected: usize,
        /// Number of rows supplied.
        rows: usize,
        /// Length of the first offending row.
        cols: usize,
    },

    /// A cell index is outside the grid.
    #[error("Grid cell ({0}, {1}) is outside a {2}x{2} grid")]
    CellOutOfBounds(usize, usize, usize),

    /// Image level failure, e.g. a manual mask of the wrong size.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Which end of the raster a band of rows is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BandDirection {
    /// The first rows.
    Top,
    /// The last rows.
    Bottom,
}

/// Square grid of cells, each of which can be enabled for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCells {
    size: usize,
    enabled: Vec<bool>,
}

impl GridCells {
    /// Resolve a requested partition count to the one actually used.
    ///
    /// A request of 3 is coerced to 4, matching how the editing tools have
    /// always behaved. Other values outside 2, 4, 5 are rejected.
    pub fn effective_size(requested: usize) -> Result<usize, RegionError> {
        match requested {
            3 => {
                log::debug!("grid size 3 requested, using 4");
                Ok(4)
            }
            s if SUPPORTED_GRID_SIZES.contains(&s) => Ok(s),
            s => Err(RegionError::UnsupportedGridSize(s)),
        }
    }

    /// Create a grid with every cell disabled.
    pub fn new(requested: usize) -> Result<Self, RegionError> {
        let size = Self::effective_size(requested)?;
        Ok(Self {
            size,
            enabled: vec![false; size * size],
        })
    }

    /// Create a grid from a row-major matrix of enable flags.
    ///
    /// The matrix must match the effective size, so a request of 3 needs a
    /// 4x4 matrix.
    pub fn from_rows(requested: usize, rows: &[Vec<bool>]) -> Result<Self, RegionError> {
        let size = Self::effective_size(requested)?;
        if let Some(bad) = rows.iter().find(|r| r.len() != size) {
            return Err(RegionError::CellMatrixShape {
                expected: size,
                rows: rows.len(),
                cols: bad.len(),
            });
        }
        if rows.len() != size {
            return Err(RegionError::CellMatrixShape {
                expected: size,
                rows: rows.len(),
                cols: size,
            });
        }

        Ok(Self {
            size,
            enabled: rows.iter().flatten().copied().collect(),
        })
    }

    /// Number of cells per axis.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the cell at `(row, col)` is enabled. Cells outside the grid are not.
    pub fn is_enabled(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.enabled[row * self.size + col]
    }

    /// Enable or disable the cell at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, enabled: bool) -> Result<(), RegionError> {
        if row >= self.size || col >= self.size {
            return Err(RegionError::CellOutOfBounds(row, col, self.size));
        }
        self.enabled[row * self.size + col] = enabled;
        Ok(())
    }

    /// Enable flags as a row-major matrix.
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.enabled.chunks(self.size).map(|r| r.to_vec()).collect()
    }
}

/// Split `[0, n)` into `parts` contiguous ranges.
///
/// Boundary `i` sits at `floor(i * n / parts)`, so the ranges never overlap,
/// leave no gaps and differ in length by at most one.
///
/// # Example
///
/// ```
/// use rasterprep_imgproc::region::grid_ranges;
///
/// assert_eq!(grid_ranges(20, 4), vec![0..5, 5..10, 10..15, 15..20]);
/// assert_eq!(grid_ranges(22, 4), vec![0..5, 5..11, 11..16, 16..22]);
/// ```
pub fn grid_ranges(n: usize, parts: usize) -> Vec<Range<usize>> {
    if parts == 0 {
        return Vec::new();
    }
    (0..parts)
        .map(|i| i * n / parts..(i + 1) * n / parts)
        .collect()
}

/// A selectable area of the raster.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// The first or last `rows` rows.
    Band {
        /// Number of rows, clamped to the raster height.
        rows: usize,
        /// Which end of the raster.
        direction: BandDirection,
    },
    /// Everything farther than `radius` from the grid center.
    ///
    /// The exterior is selected so that effects land on the background and
    /// leave the drawn glyph alone.
    Circular {
        /// Distance from `((N-1)/2, (N-1)/2)` that is kept untouched.
        radius: f32,
    },
    /// The union of the enabled grid cells.
    Grid(GridCells),
    /// A mask painted by hand, used as-is.
    Manual(AreaMask),
}

impl Region {
    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Region::Band { .. } => "band",
            Region::Circular { .. } => "circular",
            Region::Grid(_) => "grid",
            Region::Manual(_) => "manual",
        }
    }

    /// Build the mask this region selects on a raster of `size`.
    ///
    /// # Errors
    ///
    /// A manual mask of a different size is rejected with
    /// [`ImageError::InvalidImageSize`].
    ///
    /// # Example
    ///
    /// ```
    /// use rasterprep_image::ImageSize;
    /// use rasterprep_imgproc::region::{BandDirection, Region};
    ///
    /// let band = Region::Band { rows: 2, direction: BandDirection::Bottom };
    /// let mask = band.area_mask(ImageSize::square(4)).unwrap();
    ///
    /// assert_eq!(mask.count(), 8);
    /// assert!(mask.is_selected(3, 0));
    /// assert!(!mask.is_selected(1, 0));
    /// ```
    pub fn area_mask(&self, size: ImageSize) -> Result<AreaMask, RegionError> {
        let mask = match self {
            Region::Band { rows, direction } => {
                let k = (*rows).min(size.height);
                let selected = match direction {
                    BandDirection::Top => 0..k,
                    BandDirection::Bottom => size.height - k..size.height,
                };
                AreaMask::from_fn(size, |y, _| selected.contains(&y))
            }
            Region::Circular { radius } => {
                let (cx, cy) = size.center();
                AreaMask::from_fn(size, |y, x| {
                    let (ddx, ddy) = (x as f32 - cx, y as f32 - cy);
                    (ddx * ddx + ddy * ddy).sqrt() > *radius
                })
            }
            Region::Grid(cells) => {
                let row_ranges = grid_ranges(size.height, cells.size());
                let col_ranges = grid_ranges(size.width, cells.size());
                let cell_of = |ranges: &[Range<usize>], i: usize| {
                    ranges.iter().position(|r| r.contains(&i)).unwrap_or(0)
                };
                AreaMask::from_fn(size, |y, x| {
                    cells.is_enabled(cell_of(&row_ranges, y), cell_of(&col_ranges, x))
                })
            }
            Region::Manual(mask) => {
                mask.ensure_size(size)?;
                mask.clone()
            }
        };

        Ok(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::{grid_ranges, BandDirection, GridCells, Region, RegionError};
    use rasterprep_image::{AreaMask, ImageError, ImageSize};

    #[test]
    fn band_top_and_bottom() -> Result<(), RegionError> {
        let size = ImageSize::square(20);

        let top = Region::Band {
            rows: 5,
            direction: BandDirection::Top,
        }
        .area_mask(size)?;
        assert_eq!(top.count(), 100);
        assert!(top.is_selected(4, 19));
        assert!(!top.is_selected(5, 0));

        let bottom = Region::Band {
            rows: 3,
            direction: BandDirection::Bottom,
        }
        .area_mask(size)?;
        assert_eq!(bottom.count(), 60);
        assert!(bottom.is_selected(17, 0));
        assert!(!bottom.is_selected(16, 0));

        Ok(())
    }

    #[test]
    fn band_zero_selects_nothing() -> Result<(), RegionError> {
        for direction in [BandDirection::Top, BandDirection::Bottom] {
            let mask = Region::Band { rows: 0, direction }.area_mask(ImageSize::square(20))?;
            assert!(mask.is_empty());
        }

        Ok(())
    }

    #[test]
    fn band_longer_than_image_selects_all() -> Result<(), RegionError> {
        let mask = Region::Band {
            rows: 30,
            direction: BandDirection::Bottom,
        }
        .area_mask(ImageSize::square(20))?;
        assert_eq!(mask.count(), 400);

        Ok(())
    }

    #[test]
    fn circular_selects_exterior() -> Result<(), RegionError> {
        let size = ImageSize::square(20);
        let mask = Region::Circular { radius: 8.0 }.area_mask(size)?;

        // corners are far away, the four center pixels are ~0.7 from the center
        assert!(mask.is_selected(0, 0));
        assert!(mask.is_selected(19, 19));
        assert!(!mask.is_selected(9, 9));
        assert!(!mask.is_selected(10, 10));

        // (x=17, y=10) is at distance sqrt(7.5^2 + 0.5^2) < 8, (x=18, y=10) beyond
        assert!(!mask.is_selected(10, 17));
        assert!(mask.is_selected(10, 18));

        Ok(())
    }

    #[test]
    fn circular_radius_bounds() -> Result<(), RegionError> {
        let size = ImageSize::square(20);
        // every pixel is strictly farther than 0 from the continuous center
        assert_eq!(Region::Circular { radius: 0.0 }.area_mask(size)?.count(), 400);
        // the farthest corner is at 9.5 * sqrt(2) < 20
        assert!(Region::Circular { radius: 20.0 }.area_mask(size)?.is_empty());

        Ok(())
    }

    #[test]
    fn grid_partition_covers_exactly_once() {
        for n in [20usize, 21, 23] {
            for parts in [2usize, 4, 5] {
                let ranges = grid_ranges(n, parts);
                assert_eq!(ranges.len(), parts);
                assert_eq!(ranges[0].start, 0);
                assert_eq!(ranges[parts - 1].end, n);
                for w in ranges.windows(2) {
                    assert_eq!(w[0].end, w[1].start);
                }
            }
        }
    }

    #[test]
    fn grid_cells_union_covers_pixels_once() -> Result<(), RegionError> {
        let size = ImageSize::square(20);
        for requested in [2usize, 4, 5] {
            let mut hits = vec![0usize; size.num_pixels()];
            for r in 0..requested {
                for c in 0..requested {
                    let mut cells = GridCells::new(requested)?;
                    cells.set(r, c, true)?;
                    let mask = Region::Grid(cells).area_mask(size)?;
                    assert!(!mask.is_empty());
                    for (h, &s) in hits.iter_mut().zip(mask.as_slice()) {
                        *h += s as usize;
                    }
                }
            }
            assert!(hits.iter().all(|&h| h == 1));
        }

        Ok(())
    }

    #[test]
    fn grid_selects_enabled_cells() -> Result<(), RegionError> {
        let cells = GridCells::from_rows(2, &[vec![true, false], vec![false, true]])?;
        let mask = Region::Grid(cells).area_mask(ImageSize::square(20))?;

        assert_eq!(mask.count(), 200);
        assert!(mask.is_selected(0, 0));
        assert!(mask.is_selected(9, 9));
        assert!(!mask.is_selected(0, 10));
        assert!(mask.is_selected(19, 19));

        Ok(())
    }

    #[test]
    fn grid_size_three_is_coerced() -> Result<(), RegionError> {
        assert_eq!(GridCells::new(3)?.size(), 4);
        assert_eq!(GridCells::effective_size(5)?, 5);
        assert_eq!(GridCells::new(6), Err(RegionError::UnsupportedGridSize(6)));
        assert_eq!(GridCells::new(1), Err(RegionError::UnsupportedGridSize(1)));

        Ok(())
    }

    #[test]
    fn grid_matrix_shape_checked() {
        let res = GridCells::from_rows(2, &[vec![true, false]]);
        assert_eq!(
            res,
            Err(RegionError::CellMatrixShape {
                expected: 2,
                rows: 1,
                cols: 2
            })
        );

        let res = GridCells::from_rows(3, &[vec![true; 3], vec![true; 3], vec![true; 3]]);
        assert!(matches!(res, Err(RegionError::CellMatrixShape { expected: 4, .. })));
    }

    #[test]
    fn manual_mask_used_as_is() -> Result<(), RegionError> {
        let size = ImageSize::square(3);
        let mut painted = AreaMask::empty(size);
        painted.set(1, 1, true)?;

        let mask = Region::Manual(painted.clone()).area_mask(size)?;
        assert_eq!(mask, painted);

        let res = Region::Manual(painted).area_mask(ImageSize::square(4));
        assert_eq!(
            res,
            Err(RegionError::Image(ImageError::InvalidImageSize(3, 3, 4, 4)))
        );

        Ok(())
    }
}
