use paramorph_image::ImageError;

use crate::parallel::ParallelError;

/// Errors related to parabolic morphological operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MorphologyError {
    /// The requested axis does not exist.
    #[error("axis {axis} out of bounds for an image with {ndim} dimensions")]
    AxisOutOfBounds {
        /// The requested axis.
        axis: usize,
        /// The number of image dimensions.
        ndim: usize,
    },

    /// A scale entry is not a finite positive number.
    #[error("invalid scale {value} along axis {axis}, must be finite and positive")]
    InvalidScale {
        /// The offending axis.
        axis: usize,
        /// The offending value.
        value: f64,
    },

    /// A radius entry is not a finite positive number.
    #[error("invalid radius {value} along axis {axis}, must be finite and positive")]
    InvalidRadius {
        /// The offending axis.
        axis: usize,
        /// The offending value.
        value: f64,
    },

    /// The parabola curvature of an axis is zero or not finite in the sample type.
    #[error("scale {scale} along axis {axis} gives a curvature that is zero or not finite in the sample type")]
    CurvatureOutOfRange {
        /// The offending axis.
        axis: usize,
        /// The scale requested for that axis.
        scale: f64,
    },

    /// A safe border margin does not fit in the addressable image extent.
    #[error("safe border of {margin} samples along axis {axis} exceeds the addressable extent")]
    BorderTooLarge {
        /// The offending axis.
        axis: usize,
        /// The requested margin, in samples.
        margin: f64,
    },

    /// Source and destination images differ in shape.
    #[error("shape mismatch: source {0:?}, destination {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// A binary operation received a sample other than 0 or 1.
    #[error("binary input must only contain 0 and 1, found another value at offset {offset}")]
    NonBinaryInput {
        /// Offset of the first offending sample.
        offset: usize,
    },

    /// A value cannot be represented in the working sample type.
    #[error("value cannot be represented in the working sample type")]
    NumericConversion,

    /// Error from the image layer.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error from the thread pool.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
