use rayon::prelude::*;

use rasterprep_image::Image;

/// Apply a function to each pixel in the image in parallel.
pub fn par_iter_rows_val<T1, T2>(
    src: &Image<T1>,
    dst: &mut Image<T2>,
    f: impl Fn(&T1, &mut T2) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let cols = src.cols();
    if cols == 0 {
        return;
    }
    src.as_slice()
        .par_chunks_exact(cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(cols))
        .for_each(|(src_chunk, dst_chunk)| {
            src_chunk
                .iter()
                .zip(dst_chunk.iter_mut())
                .for_each(|(src_pixel, dst_pixel)| {
                    f(src_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each pixel in the image in parallel with two values.
pub fn par_iter_rows_val_two<T1, T2, T3>(
    src1: &Image<T1>,
    src2: &Image<T2>,
    dst: &mut Image<T3>,
    f: impl Fn(&T1, &T2, &mut T3) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
    T3: Send + Sync,
{
    let cols = src1.cols();
    if cols == 0 {
        return;
    }
    src1.as_slice()
        .par_chunks_exact(cols)
        .zip(src2.as_slice().par_chunks_exact(cols))
        .zip(dst.as_slice_mut().par_chunks_exact_mut(cols))
        .for_each(|((src1_chunk, src2_chunk), dst_chunk)| {
            src1_chunk
                .iter()
                .zip(src2_chunk.iter())
                .zip(dst_chunk.iter_mut())
                .for_each(|((src1_pixel, src2_pixel), dst_pixel)| {
                    f(src1_pixel, src2_pixel, dst_pixel);
                });
        });
}

/// Apply a function to each pixel for grid sampling in parallel.
///
/// `map_x` and `map_y` hold, for every destination pixel, the source
/// coordinates to sample from.
pub fn par_iter_rows_resample(
    dst: &mut Image<f32>,
    map_x: &Image<f32>,
    map_y: &Image<f32>,
    f: impl Fn(&f32, &f32, &mut f32) + Send + Sync,
) {
    let cols = dst.cols();
    if cols == 0 {
        return;
    }
    let dst_slice = dst.as_slice_mut();

    dst_slice
        .par_chunks_exact_mut(cols)
        .zip(map_x.as_slice().par_chunks_exact(cols))
        .zip(map_y.as_slice().par_chunks_exact(cols))
        .for_each(|((dst_chunk, map_x_chunk), map_y_chunk)| {
            dst_chunk
                .iter_mut()
                .zip(map_x_chunk.iter().zip(map_y_chunk.iter()))
                .for_each(|(dst_pixel, (x, y))| {
                    f(x, y, dst_pixel);
                });
        });
}
