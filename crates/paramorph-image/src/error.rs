use paramorph_tensor::TensorError;

/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error from the underlying tensor.
    #[error(transparent)]
    Tensor(#[from] TensorError),

    /// Error when two images that must share a shape do not.
    #[error("Invalid image size. Got: {0:?}, expected: {1:?}")]
    InvalidImageSize(Vec<usize>, Vec<usize>),

    /// Error when a spacing entry is not a finite positive number.
    #[error("Invalid spacing {1} along axis {0}, must be finite and positive")]
    InvalidSpacing(usize, f64),

    /// Error when a pixel value cannot be represented in the target type.
    #[error("Failed to cast image data")]
    CastError,

    /// Error when an operation needs at least one pixel.
    #[error("The image is empty")]
    EmptyImage,
}
