#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the io module.
pub mod error;

/// High-level read and write functions for dataset files.
pub mod functional;

pub use crate::error::IoError;
