use std::ops;

use paramorph_tensor::Tensor;

use crate::error::ImageError;

/// Represents an N-dimensional image with physical spacing.
///
/// The samples live in a row-major [`Tensor`] whose shape is the image extent, slowest axis
/// first. Each axis carries the physical distance between two neighbouring samples, which
/// defaults to `1.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const N: usize> {
    tensor: Tensor<T, N>,
    spacing: [f64; N],
}

/// helper to deference the inner tensor
impl<T, const N: usize> ops::Deref for Image<T, N> {
    type Target = Tensor<T, N>;

    fn deref(&self) -> &Self::Target {
        &self.tensor
    }
}

/// helper to deference the inner tensor
impl<T, const N: usize> ops::DerefMut for Image<T, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tensor
    }
}

impl<T, const N: usize> Image<T, N> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `shape` - The extent of the image along every axis.
    /// * `data` - The pixel data of the image in row-major order.
    ///
    /// # Returns
    ///
    /// A new image with unit spacing.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image shape, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use paramorph_image::Image;
    ///
    /// let image = Image::<u8, 2>::new([20, 10], vec![0u8; 10 * 20]).unwrap();
    ///
    /// assert_eq!(image.shape, [20, 10]);
    /// assert_eq!(image.spacing(), [1.0, 1.0]);
    /// ```
    pub fn new(shape: [usize; N], data: Vec<T>) -> Result<Self, ImageError> {
        Ok(Self::from_tensor(Tensor::from_shape_vec(shape, data)?))
    }

    /// Create a new image with the given shape and pixel value.
    ///
    /// # Examples
    ///
    /// ```
    /// use paramorph_image::Image;
    ///
    /// let image = Image::<f32, 3>::from_size_val([4, 5, 6], 1.5);
    /// assert_eq!(image.numel(), 120);
    /// ```
    pub fn from_size_val(shape: [usize; N], val: T) -> Self
    where
        T: Clone,
    {
        Self::from_tensor(Tensor::from_shape_val(shape, val))
    }

    /// Wrap a tensor as an image with unit spacing.
    pub fn from_tensor(tensor: Tensor<T, N>) -> Self {
        Self {
            tensor,
            spacing: [1.0; N],
        }
    }

    /// Replace the physical spacing of the image.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidSpacing`] if any entry is not finite and positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use paramorph_image::Image;
    ///
    /// let image = Image::<f32, 2>::from_size_val([3, 3], 0.0)
    ///     .with_spacing([0.5, 2.0])
    ///     .unwrap();
    /// assert_eq!(image.spacing(), [0.5, 2.0]);
    /// assert!(Image::<f32, 1>::from_size_val([3], 0.0).with_spacing([0.0]).is_err());
    /// ```
    pub fn with_spacing(mut self, spacing: [f64; N]) -> Result<Self, ImageError> {
        self.set_spacing(spacing)?;
        Ok(self)
    }

    /// In-place counterpart of [`Self::with_spacing`].
    pub fn set_spacing(&mut self, spacing: [f64; N]) -> Result<(), ImageError> {
        for (axis, &s) in spacing.iter().enumerate() {
            if !(s.is_finite() && s > 0.0) {
                return Err(ImageError::InvalidSpacing(axis, s));
            }
        }
        self.spacing = spacing;
        Ok(())
    }

    /// Physical distance between neighbouring samples, per axis.
    #[inline]
    pub fn spacing(&self) -> [f64; N] {
        self.spacing
    }

    /// Get the extent of the image along every axis.
    #[inline]
    pub fn size(&self) -> [usize; N] {
        self.tensor.shape
    }

    /// Apply `f` to every pixel, keeping shape and spacing.
    pub fn map<U, F>(&self, f: F) -> Image<U, N>
    where
        F: Fn(&T) -> U,
    {
        Image {
            tensor: self.tensor.map(f),
            spacing: self.spacing,
        }
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// # Returns
    ///
    /// A new image with the pixel data cast to the given type and the same spacing.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::CastError`] if a value is not representable in `U`.
    pub fn cast<U>(&self) -> Result<Image<U, N>, ImageError>
    where
        U: num_traits::NumCast,
        T: num_traits::NumCast + Copy,
    {
        let casted_data = self
            .as_slice()
            .iter()
            .map(|&x| U::from(x).ok_or(ImageError::CastError))
            .collect::<Result<Vec<U>, ImageError>>()?;

        Ok(Image {
            tensor: Tensor::from_shape_vec(self.shape, casted_data)?,
            spacing: self.spacing,
        })
    }

    /// Compute the minimum and maximum pixel values.
    ///
    /// NaN samples are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::EmptyImage`] if the image has no comparable pixels.
    ///
    /// # Examples
    ///
    /// ```
    /// use paramorph_image::Image;
    ///
    /// let image = Image::<f32, 1>::new([4], vec![3.0, -1.0, 7.0, 2.0]).unwrap();
    /// assert_eq!(image.min_max().unwrap(), (-1.0, 7.0));
    /// ```
    pub fn min_max(&self) -> Result<(T, T), ImageError>
    where
        T: PartialOrd + Copy,
    {
        let mut iter = self
            .as_slice()
            .iter()
            .copied()
            .filter(|x| x.partial_cmp(x).is_some());
        let first = iter.next().ok_or(ImageError::EmptyImage)?;
        Ok(iter.fold((first, first), |(lo, hi), x| {
            (if x < lo { x } else { lo }, if x > hi { x } else { hi })
        }))
    }
}

/// Check that two images have the same shape.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] with both shapes when they differ.
pub fn check_same_size<T, U, const N: usize>(
    a: &Image<T, N>,
    b: &Image<U, N>,
) -> Result<(), ImageError> {
    if a.shape != b.shape {
        return Err(ImageError::InvalidImageSize(
            a.shape.to_vec(),
            b.shape.to_vec(),
        ));
    }
    Ok(())
}
