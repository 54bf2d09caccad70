#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// class-difference analysis over a labelled dataset.
pub mod analysis;

/// transformation settings and their validation.
pub mod config;

/// raw and processed images with their labels.
pub mod dataset;

/// Error types for the pipeline module.
pub mod error;

/// ordered stage execution over single images and dataset ranges.
pub mod pipeline;

pub use crate::config::TransformConfig;
pub use crate::dataset::{Dataset, LabelMismatch};
pub use crate::error::{ConfigError, DatasetError, PipelineError};
pub use crate::pipeline::{ApplyOutcome, BatchReport, Pipeline, Stage};
