use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use rasterprep_image::{Image, ImageSize};
use rasterprep_imgproc::{
    resize::rescale,
    translate::recenter_by_centroid,
    warp::{get_rotation_matrix2d, rotate, warp_affine},
};

fn glyph(n: usize) -> Image<f32> {
    let c = n as f32 / 3.0;
    Image::from_fn(ImageSize::square(n), |y, x| {
        let (dx, dy) = (x as f32 - c, y as f32 - c);
        if (dx * dx + dy * dy).sqrt() < n as f32 / 6.0 {
            1.0
        } else {
            0.0
        }
    })
}

fn bench_warp_affine(c: &mut Criterion) {
    let mut group = c.benchmark_group("WarpAffine");

    for n in [20usize, 64, 256].iter() {
        group.throughput(criterion::Throughput::Elements((n * n) as u64));

        let image = glyph(*n);
        let output = Image::<f32>::zeros(image.size());
        let m = get_rotation_matrix2d(image.size().center(), 30.0, 1.0);

        group.bench_with_input(
            BenchmarkId::new("bilinear", n),
            &(&image, &output, m),
            |b, i| {
                let (src, mut dst, m) = (i.0, i.1.clone(), i.2);
                b.iter(|| {
                    warp_affine(
                        black_box(src),
                        black_box(&mut dst),
                        black_box(&m),
                    )
                })
            },
        );
    }
    group.finish();
}

fn bench_geometry_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("Geometry");

    for n in [20usize, 64, 256].iter() {
        group.throughput(criterion::Throughput::Elements((n * n) as u64));

        let image = glyph(*n);
        let output = Image::<f32>::zeros(image.size());

        group.bench_with_input(BenchmarkId::new("recenter", n), &(&image, &output), |b, i| {
            let (src, mut dst) = (i.0, i.1.clone());
            b.iter(|| recenter_by_centroid(black_box(src), black_box(&mut dst)))
        });

        group.bench_with_input(BenchmarkId::new("rotate", n), &(&image, &output), |b, i| {
            let (src, mut dst) = (i.0, i.1.clone());
            b.iter(|| rotate(black_box(src), black_box(&mut dst), black_box(15.0)))
        });

        group.bench_with_input(BenchmarkId::new("rescale", n), &(&image, &output), |b, i| {
            let (src, mut dst) = (i.0, i.1.clone());
            b.iter(|| rescale(black_box(src), black_box(&mut dst), black_box(1.3)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_warp_affine, bench_geometry_stages);
criterion_main!(benches);
