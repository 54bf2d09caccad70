/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when two images (or an image and a mask) have different sizes.
    #[error("Image size {0}x{1} does not match the expected size {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a raster that must be square is not.
    #[error("Image must be square, got {0}x{1}")]
    NotSquare(usize, usize),

    /// Error when the image has zero width or height.
    #[error("Image must not be empty")]
    EmptyImage,

    /// Error when a pixel value falls outside the unit interval.
    #[error("Pixel {index} has value {value} outside of [0, 1]")]
    ValueOutOfRange {
        /// Flat index of the offending pixel.
        index: usize,
        /// The offending value.
        value: f32,
    },

    /// Error when a zoom factor is not finite or outside `(0, max]`.
    #[error("Scale factor {0} is outside (0, {1}]")]
    InvalidScale(f32, f32),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when an operation was built without the capability it needs.
    #[error("Capability not available in this build: {0}")]
    CapabilityUnavailable(&'static str),
}
