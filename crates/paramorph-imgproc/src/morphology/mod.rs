/// Separable 1-D parabolic line transforms.
pub mod line;

/// Axis-wise application of the line transforms.
pub mod axis;

/// Options shared by the parabolic operations.
pub mod config;

/// Full N-D erosion and dilation.
pub mod erode_dilate;

/// Opening and closing with optional border protection.
pub mod open_close;

/// Binary erosion, dilation, opening and closing.
pub mod binary;

/// Euclidean distance transforms.
pub mod distance;

/// Morphological sharpening.
pub mod sharpen;

mod error;

pub use axis::parabolic_axis_pass;
pub use binary::{binary_close, binary_dilate, binary_erode, binary_open};
pub use config::{
    LineAlgorithm, ParabolicAlgorithm, ParabolicConfig, Radius, Scale, StructuringShape,
    DEFAULT_CONTACT_POINT_THRESHOLD,
};
pub use distance::{distance_transform, signed_distance_transform};
pub use erode_dilate::{dilate, dilate_inplace, erode, erode_inplace};
pub use error::MorphologyError;
pub use line::{
    transform_line_contact_point, transform_line_intersection, ContactPointWorkspace, Dilation,
    Erosion, IntersectionWorkspace, Polarity,
};
pub use open_close::{close, open, safe_border_margins};
pub use sharpen::{sharpen, sharpen_op};
