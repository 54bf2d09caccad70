use argh::FromArgs;
use std::path::PathBuf;

use rasterprep::{
    image::{ImageSize, Label},
    io::functional as F,
    pipeline::{
        analysis::{importance_filter, ImportanceOptions},
        Dataset,
    },
};

#[derive(FromArgs)]
/// Keep only the pixels that tell two classes apart
struct Args {
    /// path to a csv file of flattened images, repeat to append files
    #[argh(option, short = 'i')]
    images: Vec<PathBuf>,

    /// path to a csv file of labels, repeat to append files
    #[argh(option, short = 'l')]
    labels: Vec<PathBuf>,

    /// side of the square images in pixels (default: 20)
    #[argh(option, default = "20")]
    size: usize,

    /// class to keep, given twice (default: every image, which must hold two classes)
    #[argh(option, short = 'k')]
    class: Vec<String>,

    /// importance threshold in percent of the largest difference (default: 50)
    #[argh(option, short = 't', default = "50.0")]
    threshold: f32,

    /// fit on the images as loaded instead of recentering them
    #[argh(switch)]
    no_recenter: bool,

    /// path of the filtered images csv
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// path of the labels csv written alongside the filtered images
    #[argh(option)]
    labels_output: Option<PathBuf>,

    /// path of a one-row csv holding the mask as 0/1 weights
    #[argh(option)]
    mask_output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let size = ImageSize::square(args.size);

    let mut dataset = Dataset::default();
    for path in &args.images {
        let rows = F::read_images_csv(path, size)?;
        if !rows.rejected.is_empty() {
            println!(
                "{}: skipped {} malformed rows",
                path.display(),
                rows.rejected.len()
            );
        }
        dataset.extend(rows.images)?;
    }
    for path in &args.labels {
        dataset.extend_labels(F::read_labels_csv(path)?);
    }

    let classes = match args.class.as_slice() {
        [] => None,
        [a, b] => Some([Label::new(a), Label::new(b)]),
        other => return Err(format!("expected two classes, got {}", other.len()).into()),
    };

    let options = ImportanceOptions {
        classes,
        recenter: !args.no_recenter,
        threshold_pct: args.threshold,
    };
    log::debug!("importance options: {options:?}");
    let result = importance_filter(&dataset, &options)?;

    let [a, b] = result.model.labels();
    let [count_a, count_b] = result.model.counts();
    println!("class {a}: {count_a} images, class {b}: {count_b} images");
    println!(
        "max difference {:.4}, threshold {}% keeps {} of {} pixels",
        result.model.max_diff(),
        args.threshold,
        result.mask.count(),
        size.num_pixels()
    );

    F::write_images_csv(&args.output, &result.images)?;
    if let Some(path) = &args.labels_output {
        F::write_labels_csv(path, &result.labels)?;
    }
    if let Some(path) = &args.mask_output {
        F::write_images_csv(path, &[result.mask.to_weights()])?;
    }

    Ok(())
}
