use approx::assert_relative_eq;
use rasterprep_image::{Image, ImageSize, Label};
use rasterprep_io::{functional as F, IoError};

#[test]
fn images_survive_a_file_round_trip() -> Result<(), IoError> {
    let tmp_dir = tempfile::tempdir()?;
    let file_path = tmp_dir.path().join("processed.csv");

    let size = ImageSize::square(20);
    let images: Vec<Image<f32>> = (0..5)
        .map(|k| Image::from_fn(size, |y, x| ((x * 13 + y * 7 + k) % 97) as f32 / 96.0))
        .collect();

    F::write_images_csv(&file_path, &images)?;
    let rows = F::read_images_csv(&file_path, size)?;

    assert!(rows.rejected.is_empty());
    assert_eq!(rows.images.len(), images.len());
    for (read, written) in rows.images.iter().zip(&images) {
        for (a, b) in read.as_slice().iter().zip(written.as_slice()) {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
    }

    Ok(())
}

#[test]
fn labels_survive_a_file_round_trip() -> Result<(), IoError> {
    let tmp_dir = tempfile::tempdir()?;
    let file_path = tmp_dir.path().join("labels.csv");

    let labels = vec![Label::from(2), Label::from(3), Label::new("other")];
    F::write_labels_csv(&file_path, &labels)?;

    assert_eq!(F::read_labels_csv(&file_path)?, labels);

    Ok(())
}

#[test]
fn missing_file_is_reported() {
    let res = F::read_images_csv("does/not/exist.csv", ImageSize::square(20));
    assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));

    let res = F::read_labels_csv("does/not/exist.csv");
    assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
}
