use std::io::{Read, Write};
use std::path::Path;

use rasterprep_image::{Image, ImageError, ImageSize, Label};

use crate::error::{IoError, RowRejection};

/// A CSV row that was left out of a load.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// One-based line number in the source file.
    pub line: u64,
    /// Why the row was rejected.
    pub reason: RowRejection,
}

/// The result of loading a file of flat raster rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageRows {
    /// Rasters in file order.
    pub images: Vec<Image<f32>>,
    /// Rows that could not be turned into a raster.
    pub rejected: Vec<RejectedRow>,
}

fn ensure_exists(file_path: &Path) -> Result<(), IoError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }
    Ok(())
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(writer)
}

/// Reads flat raster rows from a CSV file.
///
/// Each row holds the `width * height` pixel values of one raster in
/// row-major order, without a header. Rows of the wrong length, with a
/// non-numeric token or with a value outside `[0, 1]` are rejected one by
/// one and reported with their line number; the load carries on.
///
/// # Arguments
///
/// * `file_path` - The path to the CSV file.
/// * `size` - The size of every raster in the file.
///
/// # Example
///
/// ```no_run
/// use rasterprep_image::ImageSize;
/// use rasterprep_io::functional as F;
///
/// let rows = F::read_images_csv("digits.csv", ImageSize::square(20)).unwrap();
/// for bad in &rows.rejected {
///     println!("line {}: {}", bad.line, bad.reason);
/// }
/// ```
pub fn read_images_csv(
    file_path: impl AsRef<Path>,
    size: ImageSize,
) -> Result<ImageRows, IoError> {
    let file_path = file_path.as_ref();
    ensure_exists(file_path)?;

    let file = std::fs::File::open(file_path)?;
    let rows = read_images(file, size)?;

    log::info!(
        "loaded {} images from {} ({} rows rejected)",
        rows.images.len(),
        file_path.display(),
        rows.rejected.len()
    );

    Ok(rows)
}

/// Reads flat raster rows from any CSV source.
///
/// See [`read_images_csv`] for the row format.
pub fn read_images<R: Read>(reader: R, size: ImageSize) -> Result<ImageRows, IoError> {
    let mut reader = csv_reader(reader);
    let mut rows = ImageRows::default();

    for result in reader.records() {
        let (line, parsed) = match result {
            Ok(record) => {
                if record.iter().all(str::is_empty) {
                    continue;
                }
                let line = record.position().map_or(0, |p| p.line());
                (line, parse_row(&record, size))
            }
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                (line, Err(RowRejection::Malformed(e.to_string())))
            }
        };

        match parsed {
            Ok(image) => rows.images.push(image),
            Err(reason) => {
                log::warn!("skipping row at line {line}: {reason}");
                rows.rejected.push(RejectedRow { line, reason });
            }
        }
    }

    Ok(rows)
}

fn parse_row(record: &csv::StringRecord, size: ImageSize) -> Result<Image<f32>, RowRejection> {
    let expected = size.num_pixels();
    if record.len() != expected {
        return Err(RowRejection::WrongLength {
            expected,
            found: record.len(),
        });
    }

    let data = record
        .iter()
        .enumerate()
        .map(|(column, token)| {
            token.parse::<f32>().map_err(|_| RowRejection::NotNumeric {
                column,
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Image::from_unit_values(size, data).map_err(|e| match e {
        ImageError::ValueOutOfRange { index, value } => RowRejection::OutOfRange {
            column: index,
            value,
        },
        other => RowRejection::Malformed(other.to_string()),
    })
}

/// Reads one label per row from a CSV file.
///
/// Only the first field of each row is used. Empty rows and header rows
/// starting with `label` are skipped.
pub fn read_labels_csv(file_path: impl AsRef<Path>) -> Result<Vec<Label>, IoError> {
    let file_path = file_path.as_ref();
    ensure_exists(file_path)?;

    let file = std::fs::File::open(file_path)?;
    let labels = read_labels(file)?;

    log::info!("loaded {} labels from {}", labels.len(), file_path.display());

    Ok(labels)
}

/// Reads one label per row from any CSV source.
///
/// # Example
///
/// ```
/// use rasterprep_image::Label;
/// use rasterprep_io::functional as F;
///
/// let labels = F::read_labels("label\n2\n3.0\n\n2\n".as_bytes()).unwrap();
/// assert_eq!(labels, vec![Label::from(2), Label::from(3), Label::from(2)]);
/// ```
pub fn read_labels<R: Read>(reader: R) -> Result<Vec<Label>, IoError> {
    let mut reader = csv_reader(reader);
    let mut labels = Vec::new();

    for result in reader.records() {
        let record = result?;
        let Some(first) = record.get(0).filter(|f| !f.is_empty()) else {
            continue;
        };
        if first.to_ascii_lowercase().starts_with("label") {
            log::debug!("skipping label header '{first}'");
            continue;
        }
        labels.push(Label::new(first));
    }

    Ok(labels)
}

/// Writes rasters as headerless CSV rows, one raster per row.
///
/// Values are written in their shortest form that reads back to the same
/// `f32`.
pub fn write_images_csv(
    file_path: impl AsRef<Path>,
    images: &[Image<f32>],
) -> Result<(), IoError> {
    let file = std::fs::File::create(file_path.as_ref())?;
    write_images(file, images)?;

    log::info!(
        "wrote {} images to {}",
        images.len(),
        file_path.as_ref().display()
    );

    Ok(())
}

/// Writes rasters as headerless CSV rows to any sink.
pub fn write_images<W: Write>(writer: W, images: &[Image<f32>]) -> Result<(), IoError> {
    let mut writer = csv_writer(writer);
    for image in images {
        writer.write_record(image.as_slice().iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes labels as a headerless single-column CSV file.
pub fn write_labels_csv(file_path: impl AsRef<Path>, labels: &[Label]) -> Result<(), IoError> {
    let file = std::fs::File::create(file_path.as_ref())?;
    write_labels(file, labels)
}

/// Writes labels as a headerless single-column CSV to any sink.
pub fn write_labels<W: Write>(writer: W, labels: &[Label]) -> Result<(), IoError> {
    let mut writer = csv_writer(writer);
    for label in labels {
        writer.write_record([label.as_str()])?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rasterprep_image::{Image, ImageSize, Label};

    use super::{read_images, read_labels, write_images, write_labels, RejectedRow};
    use crate::error::{IoError, RowRejection};

    #[test]
    fn read_rows_rejects_bad_ones() -> Result<(), IoError> {
        let data = "0,0.5,1,0.25\n\
                    0.1,0.2,0.3\n\
                    0.1,abc,0.3,0.4\n\
                    0.1,0.2,1.5,0.4\n\
                    \n\
                    1,1,1,1\n";

        let rows = read_images(data.as_bytes(), ImageSize::square(2))?;

        assert_eq!(rows.images.len(), 2);
        assert_eq!(rows.images[0].as_slice(), &[0.0, 0.5, 1.0, 0.25]);
        assert_eq!(rows.images[1].as_slice(), &[1.0; 4]);

        assert_eq!(
            rows.rejected,
            vec![
                RejectedRow {
                    line: 2,
                    reason: RowRejection::WrongLength {
                        expected: 4,
                        found: 3
                    }
                },
                RejectedRow {
                    line: 3,
                    reason: RowRejection::NotNumeric {
                        column: 1,
                        token: "abc".to_string()
                    }
                },
                RejectedRow {
                    line: 4,
                    reason: RowRejection::OutOfRange {
                        column: 2,
                        value: 1.5
                    }
                },
            ]
        );

        Ok(())
    }

    #[test]
    fn header_row_is_rejected() -> Result<(), IoError> {
        let data = "p0,p1\n0.5,0.5\n";
        let rows = read_images(data.as_bytes(), ImageSize::from([2, 1]))?;

        assert_eq!(rows.images.len(), 1);
        assert_eq!(rows.rejected.len(), 1);
        assert_eq!(rows.rejected[0].line, 1);

        Ok(())
    }

    #[test]
    fn non_finite_is_out_of_range() -> Result<(), IoError> {
        let rows = read_images("NaN,0\n0,inf\n".as_bytes(), ImageSize::from([2, 1]))?;

        assert!(rows.images.is_empty());
        assert!(matches!(
            rows.rejected[0].reason,
            RowRejection::OutOfRange { column: 0, .. }
        ));
        assert!(matches!(
            rows.rejected[1].reason,
            RowRejection::OutOfRange { column: 1, .. }
        ));

        Ok(())
    }

    #[test]
    fn labels_skip_header_and_blanks() -> Result<(), IoError> {
        let data = "Label,extra\n2,x\n\n3.0\n seven \n";
        let labels = read_labels(data.as_bytes())?;

        assert_eq!(
            labels,
            vec![Label::from(2), Label::from(3), Label::new("seven")]
        );

        Ok(())
    }

    #[test]
    fn write_shortest_form() -> Result<(), IoError> {
        let image = Image::new(ImageSize::from([3, 1]), vec![0.0f32, 0.1, 1.0])?;
        let mut buffer = Vec::new();
        write_images(&mut buffer, &[image.clone(), image])?;

        assert_eq!(String::from_utf8_lossy(&buffer), "0,0.1,1\n0,0.1,1\n");

        let mut buffer = Vec::new();
        write_labels(&mut buffer, &[Label::from(2), Label::new("3.0")])?;
        assert_eq!(String::from_utf8_lossy(&buffer), "2\n3\n");

        Ok(())
    }
}
