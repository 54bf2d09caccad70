use argh::FromArgs;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;

use rasterprep::{
    image::ImageSize,
    io::functional as F,
    pipeline::{Dataset, Pipeline, TransformConfig},
};

#[derive(FromArgs)]
/// Apply a configured augmentation pipeline to a range of a raster dataset
struct Args {
    /// path to a csv file of flattened images, repeat to append files
    #[argh(option, short = 'i')]
    images: Vec<PathBuf>,

    /// path to a csv file of labels, repeat to append files
    #[argh(option, short = 'l')]
    labels: Vec<PathBuf>,

    /// path to a json pipeline configuration (default: every stage disabled)
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// side of the square images in pixels (default: 20)
    #[argh(option, default = "20")]
    size: usize,

    /// first image to process (default: 0)
    #[argh(option, default = "0")]
    start: usize,

    /// last image to process, inclusive (default: the last image)
    #[argh(option)]
    end: Option<usize>,

    /// seed of the random generator (default: 0)
    #[argh(option, default = "0")]
    seed: u64,

    /// shuffle the dataset before processing
    #[argh(switch)]
    shuffle: bool,

    /// pull out of range options into range instead of failing
    #[argh(switch)]
    clamp: bool,

    /// print the default configuration as json and exit
    #[argh(switch)]
    print_config: bool,

    /// path of the processed images csv
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// path of the labels csv written alongside the processed images
    #[argh(option)]
    labels_output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    if args.print_config {
        println!("{}", TransformConfig::default().to_json_string()?);
        return Ok(());
    }

    let size = ImageSize::square(args.size);

    // load and append every input file
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
    if let Some(mismatch) = dataset.label_mismatch() {
        println!("warning: {mismatch}");
    }

    let mut config = match &args.config {
        Some(path) => TransformConfig::from_json_reader(std::fs::File::open(path)?)?,
        None => TransformConfig::default(),
    };
    if args.clamp {
        config = config.clamped(size);
    }

    log::debug!("configuration: {config:?}");

    let pipeline = Pipeline::from_config(&config, size)?;
    let mut rng = StdRng::seed_from_u64(args.seed);

    if args.shuffle {
        dataset.shuffle(&mut rng);
    }

    let last = dataset.len().checked_sub(1).ok_or("no images were loaded")?;
    let end = args.end.unwrap_or(last);
    let report = pipeline.apply_batch(&mut dataset, args.start, end, &mut rng)?;

    println!(
        "processed {} images ({} to {}) with stages [{}]",
        report.processed(),
        report.start,
        report.end,
        pipeline
            .stages()
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    for capability in &report.unavailable {
        println!("warning: {capability} is not available in this build and was skipped");
    }

    if let Some(path) = &args.output {
        F::write_images_csv(path, dataset.processed())?;
    }
    if let Some(path) = &args.labels_output {
        F::write_labels_csv(path, dataset.labels())?;
    }

    Ok(())
}
