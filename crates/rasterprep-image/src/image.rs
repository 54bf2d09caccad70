use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use rasterprep_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Create the size of an `n` x `n` raster.
    pub fn square(n: usize) -> Self {
        ImageSize {
            width: n,
            height: n,
        }
    }

    /// Number of pixels covered by this size.
    pub fn num_pixels(&self) -> usize {
        self.width * self.height
    }

    /// Validate that the size describes a non-empty square raster.
    ///
    /// # Returns
    ///
    /// The side length `N` of the raster.
    ///
    /// # Errors
    ///
    /// [`ImageError::EmptyImage`] for a zero side and [`ImageError::NotSquare`]
    /// when width and height differ.
    pub fn side(&self) -> Result<usize, ImageError> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageError::EmptyImage);
        }
        if self.width != self.height {
            return Err(ImageError::NotSquare(self.width, self.height));
        }
        Ok(self.width)
    }

    /// Continuous center of the grid as `(x, y)`, i.e. `((W-1)/2, (H-1)/2)`.
    pub fn center(&self) -> (f32, f32) {
        (
            (self.width as f32 - 1.0) / 2.0,
            (self.height as f32 - 1.0) / 2.0,
        )
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents a single channel image with pixel data stored in row-major order.
///
/// Pixel `(x, y)` lives at flat index `y * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T> {
    size: ImageSize,
    data: Vec<T>,
}

/// A grayscale raster with intensities in `[0, 1]`.
pub type RasterImage = Image<f32>;

impl<T> Image<T> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image in row-major order.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rasterprep_image::{Image, ImageSize};
    ///
    /// let image = Image::<f32>::new(
    ///    ImageSize {
    ///       width: 10,
    ///       height: 20,
    ///    },
    ///    vec![0f32; 10 * 20],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        if data.len() != size.num_pixels() {
            return Err(ImageError::InvalidDataLength(data.len(), size.num_pixels()));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and constant pixel value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rasterprep_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8>::from_size_val(ImageSize::square(4), 7).unwrap();
    ///
    /// assert_eq!(image.as_slice(), &[7u8; 16]);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.num_pixels()];
        Image::new(size, data)
    }

    /// Create a new image by evaluating `f(y, x)` for every pixel.
    pub fn from_fn(size: ImageSize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(size.num_pixels());
        for y in 0..size.height {
            for x in 0..size.width {
                data.push(f(y, x));
            }
        }
        Self { size, data }
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the pixel data as a flat row-major slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a mutable flat row-major slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return its flat row-major pixel data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get a reference to the pixel at `[y, x]`, or `None` when out of bounds.
    pub fn get(&self, index: [usize; 2]) -> Option<&T> {
        let [y, x] = index;
        if y >= self.height() || x >= self.width() {
            return None;
        }
        self.data.get(y * self.width() + x)
    }

    /// Get a mutable reference to the pixel at `[y, x]`, or `None` when out of bounds.
    pub fn get_mut(&mut self, index: [usize; 2]) -> Option<&mut T> {
        let [y, x] = index;
        if y >= self.height() || x >= self.width() {
            return None;
        }
        let cols = self.width();
        self.data.get_mut(y * cols + x)
    }

    /// Get one row of pixels.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.height() {
            return None;
        }
        let cols = self.width();
        Some(&self.data[y * cols..(y + 1) * cols])
    }

    /// Check that this image has the given size.
    ///
    /// # Errors
    ///
    /// [`ImageError::InvalidImageSize`] when the sizes differ.
    pub fn ensure_size(&self, size: ImageSize) -> Result<(), ImageError> {
        if self.size != size {
            return Err(ImageError::InvalidImageSize(
                self.width(),
                self.height(),
                size.width,
                size.height,
            ));
        }
        Ok(())
    }
}

impl<T: num_traits::Zero + Clone> Image<T> {
    /// Create a new image filled with zeros.
    pub fn zeros(size: ImageSize) -> Self {
        Self {
            size,
            data: vec![T::zero(); size.num_pixels()],
        }
    }
}

impl Image<f32> {
    /// Create a raster from intensities that must be finite and within `[0, 1]`.
    ///
    /// # Errors
    ///
    /// [`ImageError::ValueOutOfRange`] names the first offending pixel.
    ///
    /// # Examples
    ///
    /// ```
    /// use rasterprep_image::{Image, ImageSize};
    ///
    /// let ok = Image::<f32>::from_unit_values(ImageSize::square(2), vec![0.0, 0.5, 1.0, 0.25]);
    /// assert!(ok.is_ok());
    ///
    /// let bad = Image::<f32>::from_unit_values(ImageSize::square(2), vec![0.0, 1.5, 1.0, 0.25]);
    /// assert!(bad.is_err());
    /// ```
    pub fn from_unit_values(size: ImageSize, data: Vec<f32>) -> Result<Self, ImageError> {
        if let Some((index, &value)) = data
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0 || **v > 1.0)
        {
            return Err(ImageError::ValueOutOfRange { index, value });
        }
        Image::new(size, data)
    }

    /// Clamp every intensity into `[0, 1]` in place.
    pub fn clip_unit(&mut self) {
        self.data.iter_mut().for_each(|v| *v = v.clamp(0.0, 1.0));
    }

    /// Sum of all intensities.
    pub fn total_mass(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Largest intensity, or `0.0` for an empty image.
    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(0.0f32, f32::max)
    }
}
