use rasterprep_image::{Image, ImageError, ImageSize};

/// Overlap between a source axis and a destination axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisWindow {
    /// First source index copied.
    pub src_start: usize,
    /// First destination index written.
    pub dst_start: usize,
    /// Number of indices copied, zero when the axes do not overlap.
    pub extent: usize,
}

impl AxisWindow {
    /// Window for content shifted by `shift` along an axis of length `len`.
    ///
    /// Source and destination windows are both clamped to `[0, len)`.
    pub fn shifted(len: usize, shift: i64) -> Self {
        let len = len as i64;
        let src_start = (-shift).max(0);
        let src_end = len.min(len - shift);
        let dst_start = shift.max(0);

        if src_end <= src_start || dst_start >= len {
            return Self::default();
        }

        Self {
            src_start: src_start as usize,
            dst_start: dst_start as usize,
            extent: (src_end - src_start) as usize,
        }
    }

    /// Window placing an axis of `src_len` centered onto an axis of `dst_len`.
    ///
    /// The midpoint `src_len / 2` of the source lands on `dst_len / 2`; the
    /// longer axis is cropped and the shorter one padded.
    pub fn centered(src_len: usize, dst_len: usize) -> Self {
        let half = dst_len / 2;
        let mid = src_len / 2;

        let src_start = mid.saturating_sub(half);
        let src_end = src_len.min(mid + (dst_len - half));
        if src_end <= src_start {
            return Self::default();
        }

        Self {
            src_start,
            dst_start: half - (mid - src_start),
            extent: src_end - src_start,
        }
    }
}

/// Copy a rectangular window from `src` into `dst`.
///
/// Pixels of `dst` outside the window are left untouched.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image.
/// * `cols` - The horizontal window.
/// * `rows` - The vertical window.
///
/// # Errors
///
/// [`ImageError::PixelIndexOutOfBounds`] when a window does not fit either image.
///
/// # Examples
///
/// ```rust
/// use rasterprep_image::{Image, ImageSize};
/// use rasterprep_imgproc::crop::{copy_window, AxisWindow};
///
/// let image = Image::<f32>::new(ImageSize { width: 4, height: 4 }, vec![
///     0.0, 0.1, 0.2, 0.3,
///     0.4, 0.5, 0.6, 0.7,
///     0.8, 0.9, 1.0, 0.0,
///     0.0, 0.0, 0.0, 0.0,
/// ]).unwrap();
///
/// let mut cropped = Image::<f32>::zeros(ImageSize { width: 2, height: 2 });
/// let window = AxisWindow { src_start: 1, dst_start: 0, extent: 2 };
///
/// copy_window(&image, &mut cropped, window, window).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[0.5, 0.6, 0.9, 1.0]);
/// ```
pub fn copy_window<T: Copy>(
    src: &Image<T>,
    dst: &mut Image<T>,
    cols: AxisWindow,
    rows: AxisWindow,
) -> Result<(), ImageError> {
    if cols.extent == 0 || rows.extent == 0 {
        return Ok(());
    }

    let fits = |w: AxisWindow, src_len: usize, dst_len: usize| {
        w.src_start + w.extent <= src_len && w.dst_start + w.extent <= dst_len
    };
    if !fits(cols, src.cols(), dst.cols()) || !fits(rows, src.rows(), dst.rows()) {
        return Err(ImageError::PixelIndexOutOfBounds(
            cols.src_start + cols.extent,
            rows.src_start + rows.extent,
            src.cols(),
            src.rows(),
        ));
    }

    let (src_cols, dst_cols) = (src.cols(), dst.cols());
    let src_data = src.as_slice();
    let dst_data = dst.as_slice_mut();

    for i in 0..rows.extent {
        let src_offset = (rows.src_start + i) * src_cols + cols.src_start;
        let dst_offset = (rows.dst_start + i) * dst_cols + cols.dst_start;
        dst_data[dst_offset..dst_offset + cols.extent]
            .copy_from_slice(&src_data[src_offset..src_offset + cols.extent]);
    }

    Ok(())
}

/// Fit `src` onto the canvas of `dst`, centered on the midpoint of `src`.
///
/// Larger sources are center-cropped, smaller ones are zero-padded. An axis
/// with no overlap leaves the whole canvas zero.
pub fn fit_centered(src: &Image<f32>, dst: &mut Image<f32>) -> Result<(), ImageError> {
    dst.as_slice_mut().fill(0.0);

    let ImageSize { width, height } = dst.size();
    let cols = AxisWindow::centered(src.cols(), width);
    let rows = AxisWindow::centered(src.rows(), height);

    copy_window(src, dst, cols, rows)
}

#[cfg(test)]
mod tests {
    use super::AxisWindow;
    use rasterprep_image::{Image, ImageError, ImageSize};

    #[test]
    fn shifted_windows() {
        assert_eq!(
            AxisWindow::shifted(20, 3),
            AxisWindow {
                src_start: 0,
                dst_start: 3,
                extent: 17
            }
        );
        assert_eq!(
            AxisWindow::shifted(20, -4),
            AxisWindow {
                src_start: 4,
                dst_start: 0,
                extent: 16
            }
        );
        assert_eq!(AxisWindow::shifted(20, 20).extent, 0);
        assert_eq!(AxisWindow::shifted(20, -25).extent, 0);
    }

    #[test]
    fn centered_windows() {
        // crop 40 -> 20
        assert_eq!(
            AxisWindow::centered(40, 20),
            AxisWindow {
                src_start: 10,
                dst_start: 0,
                extent: 20
            }
        );
        // pad 10 -> 20
        assert_eq!(
            AxisWindow::centered(10, 20),
            AxisWindow {
                src_start: 0,
                dst_start: 5,
                extent: 10
            }
        );
        assert_eq!(AxisWindow::centered(0, 20).extent, 0);
        assert_eq!(AxisWindow::centered(7, 7).extent, 7);
    }

    #[test]
    fn fit_centered_pads() -> Result<(), ImageError> {
        let src = Image::<f32>::from_size_val(ImageSize::square(2), 1.0)?;
        let mut dst = Image::<f32>::from_size_val(ImageSize::square(4), 0.5)?;
        super::fit_centered(&src, &mut dst)?;

        #[rustfmt::skip]
        let expected = [
            0.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 1.0, 0.0,
            0.0, 1.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 0.0,
        ];
        assert_eq!(dst.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn copy_window_out_of_bounds() {
        let src = Image::<f32>::zeros(ImageSize::square(2));
        let mut dst = Image::<f32>::zeros(ImageSize::square(2));
        let w = AxisWindow {
            src_start: 1,
            dst_start: 0,
            extent: 2,
        };
        assert!(super::copy_window(&src, &mut dst, w, w).is_err());
    }
}
