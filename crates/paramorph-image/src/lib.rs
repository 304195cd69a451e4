#![deny(missing_docs)]
//! N-dimensional images with per-axis physical spacing.

/// image representation for morphology purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{check_same_size, Image};

